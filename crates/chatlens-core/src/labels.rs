//! Closed label vocabularies shared by the classifier, the accuracy engine and
//! the report generators.
//!
//! Every enum serializes as its wire label (the string the classifier emits and
//! the ground-truth data uses). Parsing accepts the wire label or the English
//! variant name, trimmed and case-insensitive; anything else is a [`LabelError`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A label that is not part of its field's vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} label: {value:?}")]
pub struct LabelError {
    pub field: &'static str,
    pub value: String,
}

/// Normalize a label for comparison: trim surrounding whitespace and case-fold.
pub fn normalize_label(value: &str) -> String {
    value.trim().to_lowercase()
}

macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every label in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire label as emitted by the classifier
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = LabelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_label(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|label| {
                        normalize_label(label.as_str()) == wanted
                            || normalize_label(label.variant_name()) == wanted
                    })
                    .ok_or_else(|| LabelError {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

label_enum! {
    /// Whether the chat ended with the customer's problem solved
    Resolution, "resolution" {
        Resolved => "Çözüldü",
        Unresolved => "Çözülemedi",
    }
}

label_enum! {
    /// Customer mood over the conversation
    Sentiment, "sentiment" {
        Positive => "Pozitif",
        Negative => "Negatif",
        Neutral => "Nötr",
    }
}

label_enum! {
    /// Kind of conversation
    ChatType, "chat type" {
        Question => "Soru",
        Complaint => "Şikayet",
        Request => "İstek",
        Problem => "Sorun",
        InformationRequest => "Bilgi alma",
        Return => "İade",
    }
}

label_enum! {
    /// The customer's underlying request category
    Intent, "intent" {
        MissingItem => "Eksik ürün",
        PasswordReset => "Şifre sıfırlama",
        Refund => "İade",
        Coupon => "Kupon",
        Cancellation => "İptal",
        DefectiveItem => "Defolu ürün",
        AccountInfo => "Hesap bilgisi",
        InvoiceError => "Fatura hatası",
        Stock => "Stok",
        Payment => "Ödeme",
        Shipping => "Kargo",
        SizeChart => "Beden tablosu",
        AddressError => "Adres hatası",
        Review => "Yorum",
        Website => "Web sitesi",
        Product => "Ürün",
        DamagedItem => "Hasarlı ürün",
        Exchange => "Değişim",
        Discount => "İndirim",
        WrongItem => "Yanlış ürün",
        AccountClosure => "Hesap kapatma",
        Order => "Sipariş",
        Size => "Beden",
        TechnicalIssue => "Teknik sorun",
        Subscription => "Abonelik",
        Other => "Diğer",
    }
}

impl Intent {
    /// Intents the classifier may choose from. `Other` is reserved for the
    /// fallback result.
    pub fn classifiable() -> impl Iterator<Item = Intent> {
        Intent::ALL.iter().copied().filter(|i| *i != Intent::Other)
    }
}

/// The four categorical fields that can be compared against ground truth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelField {
    Resolution,
    Sentiment,
    ChatType,
    Intent,
}

impl LabelField {
    pub const ALL: [LabelField; 4] = [
        LabelField::Resolution,
        LabelField::Sentiment,
        LabelField::ChatType,
        LabelField::Intent,
    ];

    /// Machine name, used as JSON key
    pub fn key(&self) -> &'static str {
        match self {
            LabelField::Resolution => "resolution",
            LabelField::Sentiment => "sentiment",
            LabelField::ChatType => "chat_type",
            LabelField::Intent => "intent",
        }
    }

    /// Human-readable name for reports
    pub fn title(&self) -> &'static str {
        match self {
            LabelField::Resolution => "Resolution",
            LabelField::Sentiment => "Sentiment",
            LabelField::ChatType => "Chat type",
            LabelField::Intent => "Intent",
        }
    }
}

impl fmt::Display for LabelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
