pub(crate) mod export;
pub(crate) mod filter;
pub(crate) mod output;
