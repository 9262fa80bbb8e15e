pub(crate) mod rates;
pub(crate) mod toast;
