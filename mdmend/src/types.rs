use crate::syntax::{CodeFenceHeader, parse_code_fence_header_from_block};

/// Best-effort classification of a segmented block.
///
/// Labels are informational only: segmentation never consults them, and a
/// mislabeled block still round-trips byte-exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading,
    ThematicBreak,
    CodeFence,
    List,
    BlockQuote,
    Table,
    Unknown,
}

/// A segmented block: a borrowed slice of the input text plus its kind.
///
/// Blocks carry no identity; position and content are the identity. The
/// concatenation of all blocks of a document reconstructs it exactly,
/// trailing blank lines included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub text: &'a str,
    pub kind: BlockKind,
}

impl<'a> Block<'a> {
    /// Fence header of a code-fence block.
    pub fn code_fence_header(&self) -> Option<CodeFenceHeader<'a>> {
        if self.kind != BlockKind::CodeFence {
            return None;
        }
        parse_code_fence_header_from_block(self.text.trim_start_matches(['\n', '\r']))
    }

    /// Language token of a code-fence block, e.g. `rust` for ```` ```rust ````.
    pub fn code_fence_language(&self) -> Option<&'a str> {
        self.code_fence_header().and_then(|h| h.language)
    }
}
