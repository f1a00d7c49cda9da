mod macros;

/// Returns the version of the brokerage backend, preferring the value of
/// `BROKERAGE_VERSION` at build time (set by release builds) over the crate
/// version.
pub fn brokerage_version() -> &'static str {
    option_env!("BROKERAGE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

pub trait Apply: Sized {
    /// Applies the function `f` only if `value` is `Some(...)` and provides the
    /// contained value to `f`.
    ///
    /// #### Example
    /// ```rust
    /// # use brokerage_utils::Apply;
    /// fn add_option(a: i32, b: Option<i32>) -> i32 {
    ///     a.apply_map(b, |slf, arg| slf + arg)
    /// }
    /// assert_eq!(add_option(1, None), 1);
    /// assert_eq!(add_option(1, Some(2)), 3);
    /// ```
    fn apply_map<U>(self, value: Option<U>, f: impl FnOnce(Self, U) -> Self) -> Self {
        match value {
            Some(value) => f(self, value),
            None => self,
        }
    }

    /// Folds every item of `values` into `self` using `f`.
    ///
    /// #### Example
    /// ```rust
    /// # use brokerage_utils::Apply;
    /// let sum = 1.apply_each([2, 3, 4], |slf, arg| slf + arg);
    /// assert_eq!(sum, 10);
    /// ```
    fn apply_each<U>(
        self,
        values: impl IntoIterator<Item = U>,
        f: impl FnMut(Self, U) -> Self,
    ) -> Self {
        values.into_iter().fold(self, f)
    }
}

impl<T> Apply for T {}
