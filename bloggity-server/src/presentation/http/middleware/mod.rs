pub(crate) mod access_log;
pub(crate) mod auth;
pub(crate) mod cors;
pub(crate) mod trace;
