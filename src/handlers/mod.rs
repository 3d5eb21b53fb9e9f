pub mod collection_handler;
pub mod session_handler;

pub use collection_handler::{
    add_activity, change_activity_type, create_collection, delete_collection, get_collection,
    list_collections, remove_activity, set_answers, update_activity, update_collection,
};
pub use session_handler::{
    advance_session, create_session, finish_session, get_session, health_check, join_session,
    leaderboard, start_session, submit_answer,
};
