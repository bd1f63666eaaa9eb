pub(crate) mod check;
pub(crate) mod create;
pub(crate) mod set_status;
pub(crate) mod status;
pub(crate) mod validate;
