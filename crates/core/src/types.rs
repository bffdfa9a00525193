/// Surrogate keys are handed out by whatever store owns the records (BIGSERIAL-sized).
pub type DbId = i64;
