/// Checks that a numerical value is in the provided interval `[a,b]`, returning
/// early with [`Error::OutOfInterval`](crate::error::Error::OutOfInterval) if not
///
/// ### Example
/// ```ignore
/// fn check(alpha: f64) -> tabula::error::Result<()> {
///     ensure_interval!(alpha, 0.0, 1.0);
///     Ok(())
/// }
/// ```
/// An `alpha` of `2.0` yields "Invalid value 2 for \`alpha\`. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::Error::OutOfInterval {
                name: stringify!($var),
                value: $var,
                min: $a,
                max: $b,
            });
        }
    };
}
