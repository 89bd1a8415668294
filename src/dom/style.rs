use std::fmt::Display;

/// Inline style declarations, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    declarations: Vec<(&'static str, String)>,
}

impl Style {
    pub fn set(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        if let Some((_, existing)) = self
            .declarations
            .iter_mut()
            .find(|(p, _)| *p == property)
        {
            *existing = value;
        } else {
            self.declarations.push((property, value));
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let index = self.declarations.iter().position(|(p, _)| *p == property)?;
        Some(self.declarations.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.declarations.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// Declarations present in `other` that are missing or different here.
    pub fn changes_to<'a>(&self, other: &'a Style) -> Vec<(&'static str, &'a str)> {
        other
            .iter()
            .filter(|(property, value)| self.get(property) != Some(*value))
            .collect()
    }

    /// Parses a `px` length, like the browser does for `top`.
    pub fn px(&self, property: &str) -> Option<f64> {
        self.get(property)?.strip_suffix("px")?.trim().parse().ok()
    }
}

impl Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{property}: {value};")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Style;

    #[test]
    fn set_replaces_in_place() {
        let mut style = Style::default();
        style.set("top", "1px");
        style.set("left", "11rem");
        style.set("top", "2px");
        assert_eq!(style.to_string(), "top: 2px; left: 11rem;");
        assert_eq!(style.px("top"), Some(2.0));
        assert_eq!(style.px("left"), None);
    }

    #[test]
    fn changes() {
        let mut before = Style::default();
        before.set("position", "absolute");
        before.set("top", "5px");
        let mut after = before.clone();
        after.set("position", "static");
        after.set("margin-left", "2rem");
        assert_eq!(
            before.changes_to(&after),
            vec![("position", "static"), ("margin-left", "2rem")]
        );
        assert_eq!(after.remove("top").as_deref(), Some("5px"));
        assert_eq!(after.get("top"), None);
    }
}
