//! ASCII armor for signed messages.
//!
//! ```text
//! -----BEGIN BITCOIN SIGNED MESSAGE-----
//! <message, verbatim>
//! -----BEGIN SIGNATURE-----
//! <base64 compact signature>
//! -----END BITCOIN SIGNED MESSAGE-----
//! ```

use crate::compact::CompactSignature;
use crate::error::{ArmorError, CodecError, MessageError, Result};
use std::fmt;
use std::str::FromStr;

pub const HEADER: &[u8] = b"-----BEGIN BITCOIN SIGNED MESSAGE-----";
pub const SIGNATURE_START: &[u8] = b"-----BEGIN SIGNATURE-----";
pub const FOOTER: &[u8] = b"-----END BITCOIN SIGNED MESSAGE-----";

/// A message together with its compact signature and the armored bytes it
/// was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage {
    message: Vec<u8>,
    signature: CompactSignature,
    raw: Vec<u8>,
}

impl SignedMessage {
    /// Build from parts; the armored form is the canonical encoding.
    pub fn new(message: impl Into<Vec<u8>>, signature: CompactSignature) -> Self {
        let message = message.into();
        let raw = encode(&message, &signature);
        SignedMessage {
            message,
            signature,
            raw,
        }
    }

    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// The message as text, if it is valid UTF-8
    pub fn message_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.message).ok()
    }

    pub fn signature(&self) -> &CompactSignature {
        &self.signature
    }

    /// The exact armored bytes
    pub fn buffer(&self) -> &[u8] {
        &self.raw
    }
}

impl fmt::Display for SignedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.raw))
    }
}

impl FromStr for SignedMessage {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s.as_bytes())
    }
}

fn malformed(reason: &'static str) -> MessageError {
    tracing::debug!(reason, "rejected armored message");
    ArmorError::MalformedArmor(reason).into()
}

fn find_last(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Parse armored bytes into a [`SignedMessage`].
///
/// Lines are framed by `\n` alone, so text whose header line ends in `\r\n`
/// is rejected as a missing begin marker. Each marker sits on its own line;
/// the footer line may be indented, and whitespace after it is ignored. The
/// message body ends at the last signature marker line, so a body may itself
/// quote the marker.
pub fn parse(input: &[u8]) -> Result<SignedMessage> {
    let body_start = HEADER.len() + 1;
    if !input.starts_with(HEADER) || input.get(HEADER.len()) != Some(&b'\n') {
        return Err(malformed("missing begin marker"));
    }

    let content = input.trim_ascii_end();
    if !content.ends_with(FOOTER) {
        return Err(malformed("missing end marker"));
    }
    let footer_pos = content.len() - FOOTER.len();
    let indent = content[..footer_pos]
        .iter()
        .rev()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count();
    let footer_break = match (footer_pos - indent).checked_sub(1) {
        Some(i) if i >= HEADER.len() && content[i] == b'\n' => i,
        _ => return Err(malformed("missing end marker")),
    };

    // The marker line owns the newlines on both sides; an empty body shares
    // the leading one with the header line.
    let mut marker = Vec::with_capacity(SIGNATURE_START.len() + 2);
    marker.push(b'\n');
    marker.extend_from_slice(SIGNATURE_START);
    marker.push(b'\n');
    let marker_pos = find_last(&content[HEADER.len()..=footer_break], &marker)
        .map(|i| i + HEADER.len())
        .ok_or_else(|| malformed("signature start not found"))?;

    let message = if marker_pos < body_start {
        Vec::new()
    } else {
        content[body_start..marker_pos].to_vec()
    };

    let encoded = content
        .get(marker_pos + marker.len()..footer_break)
        .unwrap_or_default()
        .trim_ascii();
    let encoded = std::str::from_utf8(encoded).map_err(|_| CodecError::InvalidBase64)?;
    let signature = CompactSignature::from_base64(encoded)?;

    Ok(SignedMessage {
        message,
        signature,
        raw: input.to_vec(),
    })
}

/// The armored bytes of `signed`, exactly as parsed or encoded.
pub fn serialize(signed: &SignedMessage) -> Vec<u8> {
    signed.raw.clone()
}

/// Canonical armored form, without a newline after the footer.
pub fn encode(message: &[u8], signature: &CompactSignature) -> Vec<u8> {
    let encoded = signature.to_base64();
    let mut out = Vec::with_capacity(
        HEADER.len() + message.len() + SIGNATURE_START.len() + encoded.len() + FOOTER.len() + 4,
    );
    out.extend_from_slice(HEADER);
    out.push(b'\n');
    out.extend_from_slice(message);
    out.push(b'\n');
    out.extend_from_slice(SIGNATURE_START);
    out.push(b'\n');
    out.extend_from_slice(encoded.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(FOOTER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact::RecoveryId;
    use num_bigint::BigInt;

    const SAMPLE_SIG: &str =
        "IBpGR29vEbbl4kmpK0fcDsT75GPeH2dg5O199D3iIkS3VcDoQahJMGJEDozXot8JGULWjN9Llq79aF+FogOoz/M=";

    fn armored(body: &str) -> String {
        format!(
            "-----BEGIN BITCOIN SIGNED MESSAGE-----\n{body}\n-----BEGIN SIGNATURE-----\n{SAMPLE_SIG}\n-----END BITCOIN SIGNED MESSAGE-----"
        )
    }

    fn reason(err: MessageError) -> &'static str {
        match err {
            MessageError::Armor(ArmorError::MalformedArmor(reason)) => reason,
            other => panic!("expected malformed armor, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_sample() {
        let text = armored("hi");
        let signed = parse(text.as_bytes()).unwrap();

        assert_eq!(signed.message(), b"hi");
        assert_eq!(signed.message_str(), Some("hi"));
        let sig = signed.signature();
        assert_eq!(
            sig.r(),
            &BigInt::parse_bytes(
                b"11884306385941066859834558634967777927278716082145975036347303871472774300855",
                10
            )
            .unwrap()
        );
        assert_eq!(
            sig.s(),
            &BigInt::parse_bytes(
                b"38787429741286654786942380905403782954160859974631158035207591010286944440307",
                10
            )
            .unwrap()
        );
        assert_eq!(sig.recovery_id(), RecoveryId::new(true, false));
        assert!(sig.is_compressed());
    }

    #[test]
    fn test_round_trip_is_byte_exact() {
        let text = armored("hi");
        let signed = parse(text.as_bytes()).unwrap();
        assert_eq!(serialize(&signed), text.as_bytes());
        assert_eq!(signed.buffer(), text.as_bytes());

        // Canonical encoding of the same parts reproduces the input
        let rebuilt = SignedMessage::new(signed.message(), signed.signature().clone());
        assert_eq!(rebuilt.buffer(), text.as_bytes());
        assert_eq!(rebuilt, signed);
    }

    #[test]
    fn test_trailing_whitespace_preserved() {
        let text = format!("{}\r\n  \n", armored("hi"));
        let signed = parse(text.as_bytes()).unwrap();
        assert_eq!(signed.message(), b"hi");
        assert_eq!(serialize(&signed), text.as_bytes());
    }

    #[test]
    fn test_multiline_message_verbatim() {
        let body = "first line\n\n  indented\ttab  \nlast";
        let signed: SignedMessage = armored(body).parse().unwrap();
        assert_eq!(signed.message(), body.as_bytes());
        assert_eq!(signed.to_string(), armored(body));
    }

    #[test]
    fn test_empty_message() {
        let sig = CompactSignature::from_base64(SAMPLE_SIG).unwrap();
        let signed = SignedMessage::new(Vec::<u8>::new(), sig.clone());
        let parsed = parse(signed.buffer()).unwrap();
        assert_eq!(parsed.message(), b"");
        assert_eq!(parsed.signature(), &sig);

        // Header line directly followed by the marker line
        let text = format!(
            "-----BEGIN BITCOIN SIGNED MESSAGE-----\n-----BEGIN SIGNATURE-----\n{SAMPLE_SIG}\n-----END BITCOIN SIGNED MESSAGE-----"
        );
        assert_eq!(parse(text.as_bytes()).unwrap().message(), b"");
    }

    #[test]
    fn test_message_quoting_marker() {
        let body = "see below\n-----BEGIN SIGNATURE-----\nnot a signature";
        let signed = parse(armored(body).as_bytes()).unwrap();
        assert_eq!(signed.message(), body.as_bytes());
    }

    #[test]
    fn test_non_utf8_message() {
        let sig = CompactSignature::from_base64(SAMPLE_SIG).unwrap();
        let signed = SignedMessage::new(vec![0xff, 0xfe, b'\n', 0x00], sig);
        let parsed = parse(signed.buffer()).unwrap();
        assert_eq!(parsed.message(), &[0xff, 0xfe, b'\n', 0x00]);
        assert_eq!(parsed.message_str(), None);
    }

    #[test]
    fn test_missing_begin_marker() {
        let text = armored("hi").replace("BEGIN BITCOIN SIGNED", "BEGIN SIGNED");
        assert_eq!(reason(parse(text.as_bytes()).unwrap_err()), "missing begin marker");

        let text = format!("\n{}", armored("hi"));
        assert_eq!(reason(parse(text.as_bytes()).unwrap_err()), "missing begin marker");

        assert_eq!(reason(parse(b"").unwrap_err()), "missing begin marker");
    }

    #[test]
    fn test_missing_end_marker() {
        let text = format!(
            "-----BEGIN BITCOIN SIGNED MESSAGE-----\nhi\n-----BEGIN SIGNATURE-----\n{SAMPLE_SIG}\n"
        );
        assert_eq!(reason(parse(text.as_bytes()).unwrap_err()), "missing end marker");

        // Footer present but not the last thing in the text
        let text = format!("{}\nhi", armored("hi"));
        assert_eq!(reason(parse(text.as_bytes()).unwrap_err()), "missing end marker");

        let text = "-----BEGIN BITCOIN SIGNED MESSAGE-----\n";
        assert_eq!(reason(parse(text.as_bytes()).unwrap_err()), "missing end marker");
    }

    #[test]
    fn test_signature_start_not_found() {
        let text = format!(
            "-----BEGIN BITCOIN SIGNED MESSAGE-----\nhi\n{SAMPLE_SIG}\n-----END BITCOIN SIGNED MESSAGE-----"
        );
        assert_eq!(
            reason(parse(text.as_bytes()).unwrap_err()),
            "signature start not found"
        );

        let text = format!(
            "-----BEGIN BITCOIN SIGNED MESSAGE-----\nhi\n\n{SAMPLE_SIG}\n        -----END BITCOIN SIGNED MESSAGE-----"
        );
        assert_eq!(
            reason(parse(text.as_bytes()).unwrap_err()),
            "signature start not found"
        );
    }

    #[test]
    fn test_markers_glued_to_signature_line() {
        // Footer on the signature line
        let text = armored("hi").replace(
            "\n-----END BITCOIN SIGNED MESSAGE-----",
            "-----END BITCOIN SIGNED MESSAGE-----",
        );
        assert_eq!(reason(parse(text.as_bytes()).unwrap_err()), "missing end marker");

        // Signature marker on the signature line
        let text = armored("hi").replace(
            "-----BEGIN SIGNATURE-----\n",
            "-----BEGIN SIGNATURE-----",
        );
        assert_eq!(
            reason(parse(text.as_bytes()).unwrap_err()),
            "signature start not found"
        );

        // Both at once
        let text = format!(
            "-----BEGIN BITCOIN SIGNED MESSAGE-----\nhi\n-----BEGIN SIGNATURE-----{SAMPLE_SIG}-----END BITCOIN SIGNED MESSAGE-----"
        );
        assert_eq!(reason(parse(text.as_bytes()).unwrap_err()), "missing end marker");
    }

    #[test]
    fn test_indented_footer() {
        let text = armored("hi").replace(
            "\n-----END BITCOIN SIGNED MESSAGE-----",
            "\n  \t-----END BITCOIN SIGNED MESSAGE-----",
        );
        let signed = parse(text.as_bytes()).unwrap();
        assert_eq!(signed.message(), b"hi");
        assert_eq!(signed.buffer(), text.as_bytes());
    }

    #[test]
    fn test_crlf_framing_rejected() {
        let text = armored("hi").replace('\n', "\r\n");
        assert_eq!(reason(parse(text.as_bytes()).unwrap_err()), "missing begin marker");
    }

    #[test]
    fn test_empty_signature_line() {
        let text = "-----BEGIN BITCOIN SIGNED MESSAGE-----\nhi\n-----BEGIN SIGNATURE-----\n-----END BITCOIN SIGNED MESSAGE-----";
        assert_eq!(
            parse(text.as_bytes()),
            Err(MessageError::Codec(CodecError::InvalidLength(0)))
        );
    }

    #[test]
    fn test_bad_signature_payload() {
        let text = armored("hi").replace(SAMPLE_SIG, "%%%");
        assert_eq!(
            parse(text.as_bytes()),
            Err(MessageError::Codec(CodecError::InvalidBase64))
        );

        let short = &SAMPLE_SIG[..SAMPLE_SIG.len() - 4];
        let text = armored("hi").replace(SAMPLE_SIG, short);
        assert_eq!(
            parse(text.as_bytes()),
            Err(MessageError::Codec(CodecError::InvalidLength(63)))
        );
    }
}
