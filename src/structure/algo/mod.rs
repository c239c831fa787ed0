pub(crate) mod rotations;
pub(crate) mod nearest_image;
pub mod find_perm;
