pub mod advice;
pub mod analysis;
pub mod docs;
pub mod programs;

pub use advice::*;
pub use analysis::*;
pub use docs::*;
pub use programs::*;
