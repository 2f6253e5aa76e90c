pub(crate) mod output;
pub(crate) mod theme;
