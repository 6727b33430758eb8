//! Sender header decoding.

use mail_parser::MessageParser;

/// Decode a raw `From:` header into `(display_name, email_address)`.
///
/// Encoded words (RFC 2047) are decoded fragment by fragment by the parser.
/// Either part comes back as an empty string when the header does not carry
/// it, including when the header fails to parse at all.
pub fn decode_sender(raw: &[u8]) -> (String, String) {
    let Some(message) = MessageParser::default().parse(raw) else {
        return (String::new(), String::new());
    };

    let Some(sender) = message.from().and_then(|from| from.first()) else {
        return (String::new(), String::new());
    };

    let display_name = sender.name().unwrap_or_default().trim().to_string();
    let address = sender.address().unwrap_or_default().to_string();
    (display_name, address)
}
