pub(crate) mod products;
