//! Generic `?` markers to SQLite numbered parameters.
//!
//! The rewrite is purely textual: a `?` inside a string literal is rewritten
//! too, so callers must not embed the marker in literal text.

/// Rewrite every `?` in `sql` to SQLite's numbered form `?1`, `?2`, ...
pub fn to_native(sql: &str) -> String {
   let mut native = String::with_capacity(sql.len() + 8);
   let mut index = 0usize;
   for ch in sql.chars() {
      if ch == '?' {
         index += 1;
         native.push('?');
         native.push_str(&index.to_string());
      } else {
         native.push(ch);
      }
   }
   native
}

/// `n` generic markers joined by `", "`.
pub fn markers(n: usize) -> String {
   vec!["?"; n].join(", ")
}
