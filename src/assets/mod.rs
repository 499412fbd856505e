pub(crate) mod decode;
pub(crate) mod pool;
pub(crate) mod prepared;
pub(crate) mod text;
