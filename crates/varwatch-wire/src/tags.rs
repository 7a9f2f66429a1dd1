//! Slot type tags and their single-byte wire codes.

use crate::codec::SPACER_SENTINEL;

/// The kind of value a slot exposes, as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Char,
    CharBuffer,
    ConstantText,
    Spacer,
}

impl TypeTag {
    /// The wire code for this tag.
    ///
    /// Unsigned integer tags are the uppercase form of their signed
    /// counterparts. The spacer shares the reserved sentinel character.
    pub const fn code(self) -> u8 {
        match self {
            TypeTag::Bool => b'b',
            TypeTag::Int8 => b'y',
            TypeTag::UInt8 => b'Y',
            TypeTag::Int16 => b'i',
            TypeTag::UInt16 => b'I',
            TypeTag::Int32 => b'l',
            TypeTag::UInt32 => b'L',
            TypeTag::Int64 => b'q',
            TypeTag::UInt64 => b'Q',
            TypeTag::Float => b'f',
            TypeTag::Char => b'c',
            TypeTag::CharBuffer => b's',
            TypeTag::ConstantText => b't',
            TypeTag::Spacer => SPACER_SENTINEL,
        }
    }

    /// Inverse of [`code`](TypeTag::code).
    pub const fn from_code(code: u8) -> Option<TypeTag> {
        Some(match code {
            b'b' => TypeTag::Bool,
            b'y' => TypeTag::Int8,
            b'Y' => TypeTag::UInt8,
            b'i' => TypeTag::Int16,
            b'I' => TypeTag::UInt16,
            b'l' => TypeTag::Int32,
            b'L' => TypeTag::UInt32,
            b'q' => TypeTag::Int64,
            b'Q' => TypeTag::UInt64,
            b'f' => TypeTag::Float,
            b'c' => TypeTag::Char,
            b's' => TypeTag::CharBuffer,
            b't' => TypeTag::ConstantText,
            SPACER_SENTINEL => TypeTag::Spacer,
            _ => return None,
        })
    }

    /// Whether the host may write this kind back.
    ///
    /// Display-only kinds are rejected on the inbound path regardless of
    /// the slot's readonly flag.
    pub const fn editable(self) -> bool {
        !matches!(self, TypeTag::ConstantText | TypeTag::Spacer)
    }

    /// Human-readable tag name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Bool => "bool",
            TypeTag::Int8 => "i8",
            TypeTag::UInt8 => "u8",
            TypeTag::Int16 => "i16",
            TypeTag::UInt16 => "u16",
            TypeTag::Int32 => "i32",
            TypeTag::UInt32 => "u32",
            TypeTag::Int64 => "i64",
            TypeTag::UInt64 => "u64",
            TypeTag::Float => "float",
            TypeTag::Char => "char",
            TypeTag::CharBuffer => "char-buffer",
            TypeTag::ConstantText => "text",
            TypeTag::Spacer => "spacer",
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
