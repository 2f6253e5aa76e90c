//! Output encoders: raster formats and batch archives.

pub(crate) mod archive;
pub(crate) mod raster;
