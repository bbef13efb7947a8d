pub(crate) mod detail;
pub(crate) mod overview;
pub(crate) mod view;
pub(crate) mod viewport;
