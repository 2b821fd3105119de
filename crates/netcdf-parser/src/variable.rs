//! Variable catalog entries and CF packing.

/// Value of a variable attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Numbers(Vec<f64>),
}

impl AttributeValue {
    /// First numeric element, if this is a numeric attribute.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Numbers(values) => values.first().copied(),
            AttributeValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Numbers(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

/// CF packing and masking attributes of a variable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Packing {
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
}

impl Packing {
    pub fn from_attributes(attributes: &[Attribute]) -> Self {
        let number = |name: &str| {
            attributes
                .iter()
                .find(|a| a.name == name)
                .and_then(|a| a.value.as_f64())
        };

        Self {
            fill_value: number("_FillValue"),
            missing_value: number("missing_value"),
            scale_factor: number("scale_factor"),
            add_offset: number("add_offset"),
        }
    }

    /// Convert a stored value to its physical value.
    ///
    /// Fill and missing markers become NaN; they are compared against the
    /// raw value, before scaling.
    pub fn unpack(&self, raw: f64) -> f64 {
        if raw.is_nan() || Some(raw) == self.fill_value || Some(raw) == self.missing_value {
            return f64::NAN;
        }
        raw * self.scale_factor.unwrap_or(1.0) + self.add_offset.unwrap_or(0.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Packing::default()
    }
}

/// Catalog entry for one variable in an open file.
#[derive(Debug, Clone)]
pub struct VariableInfo {
    pub name: String,
    /// Dimension names, outermost first.
    pub dimensions: Vec<String>,
    /// Dimension lengths, matching `dimensions`.
    pub shape: Vec<usize>,
    pub attributes: Vec<Attribute>,
    pub packing: Packing,
}

impl VariableInfo {
    pub fn new(
        name: String,
        dimensions: Vec<String>,
        shape: Vec<usize>,
        attributes: Vec<Attribute>,
    ) -> Self {
        let packing = Packing::from_attributes(&attributes);
        Self {
            name,
            dimensions,
            shape,
            attributes,
            packing,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    pub fn units(&self) -> Option<&str> {
        self.attribute("units").and_then(|v| v.as_str())
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `index` lies within the variable's shape.
    pub fn contains(&self, index: &[usize]) -> bool {
        index.len() == self.shape.len() && index.iter().zip(&self.shape).all(|(i, n)| i < n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(name: &str, v: f64) -> Attribute {
        Attribute {
            name: name.to_string(),
            value: AttributeValue::Numbers(vec![v]),
        }
    }

    #[test]
    fn test_packing_scale_and_offset() {
        let packing =
            Packing::from_attributes(&[num("scale_factor", 0.01), num("add_offset", 250.0)]);
        assert!((packing.unpack(5000.0) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_packing_masks_fill_before_scaling() {
        let packing = Packing::from_attributes(&[
            num("_FillValue", -32767.0),
            num("missing_value", -9999.0),
            num("scale_factor", 2.0),
        ]);
        assert!(packing.unpack(-32767.0).is_nan());
        assert!(packing.unpack(-9999.0).is_nan());
        assert!(packing.unpack(f64::NAN).is_nan());
        assert_eq!(packing.unpack(3.0), 6.0);
    }

    #[test]
    fn test_identity_packing() {
        let packing = Packing::from_attributes(&[]);
        assert!(packing.is_identity());
        assert_eq!(packing.unpack(273.15), 273.15);
    }

    #[test]
    fn test_variable_contains() {
        let var = VariableInfo::new(
            "t2m".into(),
            vec!["time".into(), "latitude".into(), "longitude".into()],
            vec![4, 3, 2],
            vec![],
        );
        assert!(var.contains(&[3, 2, 1]));
        assert!(!var.contains(&[4, 0, 0]));
        assert!(!var.contains(&[0, 0]));
        assert_eq!(var.len(), 24);
    }
}
