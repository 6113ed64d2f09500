mod arcmut;
pub use arcmut::ArcMut;

mod logger;
#[allow(unused_imports)]
pub use logger::*;
