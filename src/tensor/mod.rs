pub mod batch;
pub mod desc;
pub mod element;

pub use batch::Batch;
pub use desc::BatchDesc;
pub use element::Element;
