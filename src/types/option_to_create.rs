use std::fmt::Display;

/// An entry of a selection menu: one of the offered values, or a trailing
/// action such as creating a new record instead.
pub enum OptionToCreate<T>
where
    T: Display,
{
    Value(T),
    Create(&'static str),
}

impl<T> OptionToCreate<T>
where
    T: Display,
{
    /// The values followed by one `Create` entry per action label.
    pub fn with_actions(values: Vec<T>, actions: &[&'static str]) -> Vec<OptionToCreate<T>> {
        let mut options = values
            .into_iter()
            .map(OptionToCreate::Value)
            .collect::<Vec<_>>();
        options.extend(actions.iter().map(|label| OptionToCreate::Create(*label)));
        options
    }
}

impl<T> Display for OptionToCreate<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionToCreate::Value(value) => write!(f, "{}", value),
            OptionToCreate::Create(label) => write!(f, "{}", label),
        }
    }
}
