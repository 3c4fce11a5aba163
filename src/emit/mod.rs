mod drl;
mod gdst;
mod xml;

pub use drl::emit as emit_drl;
pub use gdst::emit as emit_gdst;
