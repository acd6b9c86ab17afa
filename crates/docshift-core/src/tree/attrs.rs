//! JSX attribute lists

/// Attribute value: a quoted literal or a braced expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Literal(String),
    Expression(String),
}

/// One attribute; `value: None` is a boolean attribute (`<Tabs open>`).
/// Spread attributes keep their braces in `name` (`{...props}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<AttrValue>,
}

impl Attribute {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(AttrValue::Literal(value.into())),
        }
    }

    pub fn expression(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(AttrValue::Expression(value.into())),
        }
    }

    pub fn is_spread(&self) -> bool {
        self.name.starts_with('{')
    }
}

/// Ordered attribute list with name-keyed helpers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self(attributes)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Attribute> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.0.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Literal value of an attribute; expressions holding a single string
    /// literal (`{"x"}`, `{'x'}`, `` {`x`} ``) count as literals
    pub fn literal(&self, name: &str) -> Option<&str> {
        match &self.get(name)?.value {
            Some(AttrValue::Literal(v)) => Some(v),
            Some(AttrValue::Expression(e)) => string_expression(e),
            None => None,
        }
    }

    /// Replace the value of `name` in place, or append it
    pub fn set(&mut self, attribute: Attribute) {
        match self.0.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.0.push(attribute),
        }
    }

    /// Remove every attribute called `name`; returns the first removed
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        let index = self.0.iter().position(|a| a.name == name)?;
        let removed = self.0.remove(index);
        self.0.retain(|a| a.name != name);
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Attributes {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn string_expression(expr: &str) -> Option<&str> {
    let expr = expr.trim();
    let first = expr.chars().next()?;
    if !matches!(first, '"' | '\'' | '`') || expr.len() < 2 || !expr.ends_with(first) {
        return None;
    }
    let inner = &expr[1..expr.len() - 1];
    (!inner.contains(first)).then_some(inner)
}
