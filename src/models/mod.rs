pub mod api;
pub mod internal;
pub mod records;
pub mod translation;


pub use api::*;
pub use internal::*;
pub use records::*;
