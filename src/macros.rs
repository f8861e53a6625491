// Generates the get / set / clear / test / with quartet for one attribute.
//
// The field must be an `Option<$ty>` where `$ty: Copy`; `get` falls back to
// `$default` when the field is unset.
macro_rules! attribute {
    (
        $(#[$doc:meta])*
        $field:ident: $ty:ty = $default:expr;
        $set:ident, $clear:ident, $test:ident, $with:ident
    ) => {
        $(#[$doc])*
        #[must_use]
        pub fn $field(&self) -> $ty {
            self.$field.unwrap_or($default)
        }

        pub fn $set(&mut self, value: $ty) {
            self.$field = Some(value);
        }

        pub fn $clear(&mut self) {
            self.$field = None;
        }

        #[must_use]
        pub fn $test(&self) -> bool {
            self.$field.is_some()
        }

        #[must_use]
        pub fn $with(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}
