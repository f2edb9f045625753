pub mod sm2;

pub use sm2::{
  initialize_state, now_millis, review, Quality, ReviewError, ReviewState, MAX_INTERVAL_DAYS,
  MS_PER_DAY,
};
