//! Dense index newtypes.
//!
//! Every id is local to the table it indexes: `FieldId`, `KindRef` and
//! `RefId` to one schema, `RuleId` to one linked program.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u16);

        impl $name {
            pub fn new(index: usize) -> Self {
                let raw = u16::try_from(index).unwrap_or_else(|_| {
                    panic!(concat!(stringify!($name), ": index {} out of range"), index)
                });
                Self(raw)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Field of a schema, in declaration order.
    FieldId
);
define_id!(
    /// Token-kind name referenced by a schema, resolved at link time.
    KindRef
);
define_id!(
    /// Nested type referenced through `@@` by a schema.
    RefId
);
define_id!(
    /// Rule of a linked program. Rule 0 is the root.
    RuleId
);
