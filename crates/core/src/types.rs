/// Backend primary keys are plain integers.
pub type DbId = i64;
