//! Modifier flags with pairwise-conflict enforcement.
//!
//! static/abstract/virtual are pairwise exclusive on members, and
//! static/abstract/sealed are mutually exclusive on types. The conflict check
//! is symmetric: whichever modifier arrives second triggers the error, and
//! the message names both in application order.

use crate::error::{Error, Result};

/// Modifier applied to a type declaration. At most one may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeModifier {
    /// The type cannot be instantiated or derived from an instance.
    Static,
    /// The type must be derived to be instantiated.
    Abstract,
    /// The type cannot be derived.
    Sealed,
}

impl TypeModifier {
    /// Lowercase source keyword.
    pub fn label(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Abstract => "abstract",
            Self::Sealed => "sealed",
        }
    }
}

/// Member modifier flags, validated on application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberModifiers {
    is_static: bool,
    is_abstract: bool,
    is_virtual: bool,
}

impl MemberModifiers {
    /// No modifiers set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `static` is set.
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether `abstract` is set.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Whether `virtual` is set.
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    /// Apply `static`; fails if `abstract` or `virtual` was applied first.
    pub fn set_static(&mut self, signature: &str) -> Result<()> {
        self.conflict_check("static", self.is_abstract, "abstract", signature)?;
        self.conflict_check("static", self.is_virtual, "virtual", signature)?;
        self.is_static = true;
        Ok(())
    }

    /// Apply `abstract`; fails if `static` or `virtual` was applied first.
    pub fn set_abstract(&mut self, signature: &str) -> Result<()> {
        self.conflict_check("abstract", self.is_static, "static", signature)?;
        self.conflict_check("abstract", self.is_virtual, "virtual", signature)?;
        self.is_abstract = true;
        Ok(())
    }

    /// Apply `virtual`; fails if `static` or `abstract` was applied first.
    pub fn set_virtual(&mut self, signature: &str) -> Result<()> {
        self.conflict_check("virtual", self.is_static, "static", signature)?;
        self.conflict_check("virtual", self.is_abstract, "abstract", signature)?;
        self.is_virtual = true;
        Ok(())
    }

    fn conflict_check(
        &self,
        incoming: &'static str,
        already: bool,
        existing: &'static str,
        signature: &str,
    ) -> Result<()> {
        if already {
            return Err(Box::new(Error::ConflictingModifiers {
                signature: signature.to_string(),
                first: existing,
                second: incoming,
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_are_symmetric() {
        let mut a = MemberModifiers::new();
        a.set_static("M()").unwrap();
        let err = a.set_abstract("M()").unwrap_err();
        assert_eq!(
            err.to_string(),
            "'M()' cannot be both static and abstract"
        );

        let mut b = MemberModifiers::new();
        b.set_abstract("M()").unwrap();
        let err = b.set_static("M()").unwrap_err();
        assert_eq!(
            err.to_string(),
            "'M()' cannot be both abstract and static"
        );
    }

    #[test]
    fn all_three_pairs_conflict() {
        let pairs: [(&str, &str); 3] = [
            ("static", "abstract"),
            ("abstract", "virtual"),
            ("static", "virtual"),
        ];
        for (first, second) in pairs {
            let mut mods = MemberModifiers::new();
            apply(&mut mods, first).unwrap();
            let err = apply(&mut mods, second).unwrap_err();
            assert!(err.to_string().contains(first));
            assert!(err.to_string().contains(second));
        }
    }

    #[test]
    fn repeated_application_is_idempotent() {
        let mut mods = MemberModifiers::new();
        mods.set_virtual("M()").unwrap();
        mods.set_virtual("M()").unwrap();
        assert!(mods.is_virtual());
    }

    fn apply(mods: &mut MemberModifiers, label: &str) -> Result<()> {
        match label {
            "static" => mods.set_static("M()"),
            "abstract" => mods.set_abstract("M()"),
            "virtual" => mods.set_virtual("M()"),
            other => panic!("unknown modifier {other}"),
        }
    }
}
