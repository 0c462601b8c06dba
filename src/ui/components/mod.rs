pub mod dashboard;
pub mod menu;
pub mod question_card;
pub mod quiz_progress;
