/// This module contains the metadata model.
pub(crate) mod metadata;
