//! The instruction catalog: every mnemonic Carnival knows and the operands it takes.
//!
//! The built-in catalog is constructed once, on first use, and shared by every
//! validation call. It is never mutated afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use carnival_types::OperandKind;

use OperandKind::{Label, Number, Register, StringLiteral};

/// One operand position in a signature: the kinds accepted there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandSlot {
    kinds: Vec<OperandKind>,
}

impl OperandSlot {
    /// A slot accepting any of `kinds`.
    ///
    /// # Panics
    ///
    /// If `kinds` is empty. A slot that accepts nothing is a catalog bug.
    pub fn new(kinds: &[OperandKind]) -> Self {
        assert!(!kinds.is_empty(), "operand slot needs at least one kind");
        Self {
            kinds: kinds.to_vec(),
        }
    }

    pub fn kinds(&self) -> &[OperandKind] {
        &self.kinds
    }

    pub fn accepts(&self, kind: OperandKind) -> bool {
        self.kinds.contains(&kind)
    }
}

impl fmt::Display for OperandSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

/// Ordered operand slots for one instruction. Empty means no operands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstructionSignature {
    slots: Vec<OperandSlot>,
}

impl InstructionSignature {
    pub fn new(slots: &[&[OperandKind]]) -> Self {
        Self {
            slots: slots.iter().map(|kinds| OperandSlot::new(kinds)).collect(),
        }
    }

    pub fn slots(&self) -> &[OperandSlot] {
        &self.slots
    }

    /// Number of operands the instruction expects.
    pub fn arity(&self) -> usize {
        self.slots.len()
    }
}

impl fmt::Display for InstructionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slots.is_empty() {
            return f.write_str("(no operands)");
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}")?;
        }
        Ok(())
    }
}

const R: &[OperandKind] = &[Register];
const RN: &[OperandKind] = &[Register, Number];
const L: &[OperandKind] = &[Label];
const RNS: &[OperandKind] = &[Register, Number, StringLiteral];

/// The built-in instruction set, in the order completions list it.
const BUILTIN: &[(&str, &[&[OperandKind]])] = &[
    // Data movement
    ("MOV", &[RN, RN]),
    ("PUSH", &[RN]),
    ("POP", &[R]),
    // Arithmetic
    ("ADD", &[RN, RN, R]),
    ("SUB", &[RN, RN, R]),
    ("MUL", &[RN, RN, R]),
    ("DIV", &[RN, RN, R]),
    ("INC", &[R]),
    ("DEC", &[R]),
    // Bitwise
    ("AND", &[RN, RN, R]),
    ("OR", &[RN, RN, R]),
    ("XOR", &[RN, RN, R]),
    ("NOT", &[RN, R]),
    // Control flow
    ("JMP", &[L]),
    ("CALL", &[L]),
    ("RET", &[]),
    ("JZ", &[R, L]),
    ("JNZ", &[R, L]),
    ("JG", &[RN, RN, L]),
    ("JL", &[RN, RN, L]),
    // I/O
    ("IN", &[R]),
    ("OUT", &[RNS]),
    // Halt
    ("HALT", &[]),
];

static GLOBAL: LazyLock<Catalog> = LazyLock::new(Catalog::builtin);

/// Immutable mapping from uppercase mnemonic to signature.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<(String, InstructionSignature)>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// The process-wide built-in catalog.
    pub fn global() -> &'static Catalog {
        &GLOBAL
    }

    /// Build the built-in instruction set.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN
                .iter()
                .map(|(name, slots)| (*name, InstructionSignature::new(slots))),
        )
    }

    /// Build a catalog from arbitrary entries.
    ///
    /// Keys are uppercased. A repeated mnemonic replaces the earlier signature
    /// but keeps its original position.
    pub fn from_entries<S: AsRef<str>>(
        entries: impl IntoIterator<Item = (S, InstructionSignature)>,
    ) -> Self {
        let mut catalog = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for (name, signature) in entries {
            let key = name.as_ref().to_uppercase();
            match catalog.index.get(&key) {
                Some(&pos) => catalog.entries[pos].1 = signature,
                None => {
                    catalog.index.insert(key.clone(), catalog.entries.len());
                    catalog.entries.push((key, signature));
                }
            }
        }
        catalog
    }

    /// Look up a mnemonic, case-insensitively.
    pub fn lookup(&self, mnemonic: &str) -> Option<&InstructionSignature> {
        self.index
            .get(&mnemonic.to_uppercase())
            .map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, mnemonic: &str) -> bool {
        self.lookup(mnemonic).is_some()
    }

    /// Uppercase mnemonics in declaration order.
    pub fn mnemonics(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstructionSignature)> {
        self.entries.iter().map(|(name, sig)| (name.as_str(), sig))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn builtin_has_23_instructions() {
        assert_eq!(Catalog::global().len(), 23);
    }

    #[test]
    fn keys_are_uppercase() {
        for name in Catalog::global().mnemonics() {
            assert_eq!(name, name.to_uppercase());
        }
    }

    #[rstest]
    #[case::upper("MOV")]
    #[case::lower("mov")]
    #[case::mixed("MoV")]
    fn lookup_is_case_insensitive(#[case] mnemonic: &str) {
        let sig = Catalog::global().lookup(mnemonic).expect("MOV is built in");
        assert_eq!(sig.arity(), 2);
        assert!(sig.slots()[0].accepts(Number));
        assert!(sig.slots()[1].accepts(Register));
        // `MOV r1 5` is valid, so the destination also takes a number.
        assert!(sig.slots()[1].accepts(Number));
        assert!(!sig.slots()[1].accepts(Label));
    }

    #[test]
    fn no_operand_instructions() {
        let catalog = Catalog::global();
        assert_eq!(catalog.lookup("RET").map(InstructionSignature::arity), Some(0));
        assert_eq!(catalog.lookup("HALT").map(InstructionSignature::arity), Some(0));
    }

    #[test]
    fn unknown_mnemonic_is_not_found() {
        assert!(Catalog::global().lookup("FOO").is_none());
        assert!(!Catalog::global().contains(""));
    }

    #[test]
    fn from_entries_replaces_duplicates_in_place() {
        let catalog = Catalog::from_entries([
            ("nop", InstructionSignature::default()),
            ("jmp", InstructionSignature::new(&[L])),
            ("NOP", InstructionSignature::new(&[R])),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.mnemonics().collect::<Vec<_>>(), vec!["NOP", "JMP"]);
        assert_eq!(catalog.lookup("nop").map(InstructionSignature::arity), Some(1));
    }

    #[test]
    #[should_panic(expected = "operand slot needs at least one kind")]
    fn empty_slot_is_rejected() {
        OperandSlot::new(&[]);
    }

    #[test]
    fn catalog_listing() {
        let listing = Catalog::global()
            .iter()
            .map(|(name, sig)| format!("{name:<5} {sig}"))
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(listing, @r"
        MOV   Register|Number, Register|Number
        PUSH  Register|Number
        POP   Register
        ADD   Register|Number, Register|Number, Register
        SUB   Register|Number, Register|Number, Register
        MUL   Register|Number, Register|Number, Register
        DIV   Register|Number, Register|Number, Register
        INC   Register
        DEC   Register
        AND   Register|Number, Register|Number, Register
        OR    Register|Number, Register|Number, Register
        XOR   Register|Number, Register|Number, Register
        NOT   Register|Number, Register
        JMP   Label
        CALL  Label
        RET   (no operands)
        JZ    Register, Label
        JNZ   Register, Label
        JG    Register|Number, Register|Number, Label
        JL    Register|Number, Register|Number, Label
        IN    Register
        OUT   Register|Number|String
        HALT  (no operands)
        ");
    }
}
