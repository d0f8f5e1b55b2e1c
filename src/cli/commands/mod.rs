pub mod hash_password;
pub mod migrate;
pub mod seed;
pub mod status;
