pub(crate) mod identity;
pub(crate) mod presentation;
