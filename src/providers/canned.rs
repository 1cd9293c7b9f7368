//! Offline keyword responder
//!
//! Answers from fixed Arabic and English keyword tables without any network
//! call. Useful for running the widget with no provider credentials.

use super::ChatProvider;
use crate::error::RelayResult;
use async_trait::async_trait;

/// Checked first, against both the raw and the lower-cased message
const ARABIC_RESPONSES: &[(&str, &str)] = &[
    ("مرحبا", "مرحباً بك! كيف يمكنني مساعدتك اليوم؟"),
    ("السلام عليكم", "وعليكم السلام ورحمة الله وبركاته! أهلاً وسهلاً بك"),
    ("أهلا", "أهلاً وسهلاً! كيف حالك؟"),
    ("كيف حالك", "الحمد لله بخير! وأنت كيف حالك؟"),
    ("ما اسمك", "أنا مساعد الدردشة الذكي"),
    ("مساعدة", "أنا هنا لمساعدتك! يمكنك سؤالي عن أي شيء أو الدردشة معي"),
    ("شكرا", "عفواً! هل تحتاج أي مساعدة أخرى؟"),
    ("شكراً", "عفواً! هل تحتاج أي مساعدة أخرى؟"),
    ("وداعا", "وداعاً! أتمنى لك يوماً سعيداً"),
    ("مع السلامة", "مع السلامة! كان من دواعي سروري التحدث معك"),
    (
        "ماذا تستطيع أن تفعل",
        "يمكنني الدردشة معك، الإجابة على الأسئلة، ومساعدتك في مهام مختلفة، وإنشاء الصور",
    ),
];

const ENGLISH_RESPONSES: &[(&str, &str)] = &[
    ("hello", "Hello! How can I help you today?"),
    ("hi", "Hi there! What can I do for you?"),
    ("help", "I'm here to help! You can ask me questions or just chat."),
    ("bye", "Goodbye! Have a great day!"),
    ("thanks", "You're welcome! Is there anything else I can help you with?"),
    ("how are you", "I'm doing great! Thanks for asking. How are you?"),
    (
        "what can you do",
        "I can chat with you, answer questions, and generate images from a description.",
    ),
];

const ARABIC_FALLBACK: &str =
    "عذراً، لم أفهم ما تقصد. هل يمكنك إعادة صياغة سؤالك؟ اكتب 'مساعدة' إذا كنت تحتاج للمساعدة";
const ENGLISH_FALLBACK: &str =
    "I'm not sure I understand. Could you please rephrase that? Type 'help' if you need assistance.";

/// Keyword chat provider
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedProvider;

impl CannedProvider {
    /// Reply for a message; substring match in table order
    pub fn reply_for(&self, message: &str) -> &'static str {
        let lower = message.trim().to_lowercase();

        if let Some((_, reply)) = ARABIC_RESPONSES
            .iter()
            .find(|(key, _)| message.contains(key) || lower.contains(key))
        {
            return *reply;
        }

        if let Some((_, reply)) = ENGLISH_RESPONSES.iter().find(|(key, _)| lower.contains(key)) {
            return *reply;
        }

        if message.chars().any(|c| !c.is_ascii()) {
            ARABIC_FALLBACK
        } else {
            ENGLISH_FALLBACK
        }
    }
}

#[async_trait]
impl ChatProvider for CannedProvider {
    fn provider_name(&self) -> &'static str {
        "canned"
    }

    async fn complete(&self, text: &str) -> RelayResult<String> {
        Ok(self.reply_for(text).to_string())
    }
}
