pub mod matching;
pub mod pricewalk;
pub mod progression;
