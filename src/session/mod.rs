pub(crate) mod export_session;
