/// `config_struct!`: one declaration per config section
///
/// Each field is written as `name: Type = default`. The macro emits the
/// struct with public fields, a `Default` impl built from those defaults and
/// serde derives with `#[serde(default)]`, so a TOML file may set any subset
/// of a section.
///
/// ```rust,ignore
/// config_struct! {
///     /// Holder list paging
///     pub struct HoldersConfig {
///         min_holder_count: usize = 10,
///         /// 0 means no cap
///         max_holders: usize = 0,
///     }
/// }
///
/// let partial: HoldersConfig = toml::from_str("max_holders = 500")?;
/// assert_eq!(partial.min_holder_count, 10);
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
