pub(crate) mod grid;
pub(crate) mod plan;
pub(crate) mod select;
