use std::collections::BTreeMap;

use smol_str::SmolStr;

/// Kind of jump target, each with its own counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LabelFamily {
    IfTrue,
    IfFalse,
    IfEnd,
    WhileExp,
    WhileEnd,
}

impl LabelFamily {
    #[rustfmt::skip]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::IfTrue   => "IF_TRUE",
            Self::IfFalse  => "IF_FALSE",
            Self::IfEnd    => "IF_END",
            Self::WhileExp => "WHILE_EXP",
            Self::WhileEnd => "WHILE_END",
        }
    }
}

/// Hands out unique labels within one subroutine.
///
/// Counters only ever increase, so a label is never handed out twice.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    counters: BTreeMap<LabelFamily, u32>,
}

impl LabelAllocator {
    pub fn next_label(&mut self, family: LabelFamily) -> SmolStr {
        let counter = self.counters.entry(family).or_insert(0);
        let label = SmolStr::from(format!("{}{}", family.prefix(), counter));
        *counter += 1;
        label
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_families_count_independently() {
        let mut labels = LabelAllocator::default();
        assert_eq!(labels.next_label(LabelFamily::IfTrue), "IF_TRUE0");
        assert_eq!(labels.next_label(LabelFamily::IfTrue), "IF_TRUE1");
        assert_eq!(labels.next_label(LabelFamily::WhileExp), "WHILE_EXP0");
        assert_eq!(labels.next_label(LabelFamily::IfTrue), "IF_TRUE2");
    }
}
