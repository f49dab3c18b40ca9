pub(crate) mod decompose;
pub(crate) mod coordinates;
pub(crate) mod join;
pub(crate) mod shares;
pub(crate) mod export;
pub(crate) mod clip;
pub(crate) mod clamp;
