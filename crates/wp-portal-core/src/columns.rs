use wp_api_types::{COLUMNS_AMOUNT, Message, MessageColumns};

/// Deal messages round-robin into the collage columns: message `i` lands in
/// column `i % COLUMNS_AMOUNT`, keeping on-chain order within each column.
pub fn to_columns(messages: Vec<Message>) -> MessageColumns {
    let mut columns = MessageColumns::new();
    for (index, message) in messages.into_iter().enumerate() {
        columns
            .entry(index % COLUMNS_AMOUNT)
            .or_default()
            .push(message);
    }
    columns
}
