use diesel::prelude::*;

/// One chat exchange, written append-only. Row identity and `created_at`
/// are assigned by the database.
#[derive(Insertable, Debug)]
#[diesel(table_name = super::schema::conversations)]
pub struct NewConversation<'a> {
    pub user_id: &'a str,
    pub message: &'a str,
    pub response: &'a str,
}
