use chemtune_core::{
    cell_f64, cell_str, CoreError, DataTable, DatasetSpec, ExperimentParams, FormattedDataset,
    FormattedSample, Formatter, Label, Representation, Result,
};

/// End-of-prompt and end-of-completion markers understood by the extractor.
pub const PROMPT_SUFFIX: &str = "###";
pub const COMPLETION_SUFFIX: &str = "@@@";

fn render_prompt(property: &str, representation: &str) -> String {
    format!(
        "What is the {} of {}?{}",
        property, representation, PROMPT_SUFFIX
    )
}

/// Formats raw records into prompts with numeric pass-through labels,
/// rendered at fixed decimal precision.
#[derive(Debug, Clone)]
pub struct RegressionFormatter {
    representation: Representation,
    property_name: String,
    label_column: String,
    num_digits: usize,
}

impl RegressionFormatter {
    pub fn new(
        representation: Representation,
        property_name: impl Into<String>,
        label_column: impl Into<String>,
    ) -> Self {
        Self {
            representation,
            property_name: property_name.into(),
            label_column: label_column.into(),
            num_digits: 2,
        }
    }

    pub fn with_num_digits(mut self, num_digits: usize) -> Self {
        self.num_digits = num_digits;
        self
    }
}

impl Formatter for RegressionFormatter {
    fn format(&self, table: &DataTable) -> Result<FormattedDataset> {
        let repr_column = table.resolve_column(self.representation.column_names())?;
        let mut samples = Vec::with_capacity(table.len());

        for row in table.rows() {
            let text = match cell_str(row.get(&repr_column)) {
                Some(t) if !t.trim().is_empty() => t,
                _ => continue,
            };
            let value = match cell_f64(row.get(&self.label_column)) {
                Some(v) if v.is_finite() => v,
                _ => continue,
            };
            // Labels carry the rendered precision so truth and extracted
            // predictions live on the same scale.
            let rounded = round_to(value, self.num_digits);
            samples.push(FormattedSample {
                prompt: render_prompt(&self.property_name, &text),
                completion: format!(" {:.*}{}", self.num_digits, rounded, COMPLETION_SUFFIX),
                label: Label::Numeric(rounded),
            });
        }

        if samples.is_empty() {
            return Err(CoreError::Data(format!(
                "no usable rows for representation {} and label {:?}",
                self.representation, self.label_column
            )));
        }
        Ok(FormattedDataset::new(self.property_name.clone(), samples))
    }
}

/// Formats raw records into prompts with quantile-bucketed class labels.
/// Two classes means a median split.
#[derive(Debug, Clone)]
pub struct ClassificationFormatter {
    representation: Representation,
    property_name: String,
    label_column: String,
    num_classes: usize,
}

impl ClassificationFormatter {
    pub fn new(
        representation: Representation,
        property_name: impl Into<String>,
        label_column: impl Into<String>,
        num_classes: usize,
    ) -> Self {
        Self {
            representation,
            property_name: property_name.into(),
            label_column: label_column.into(),
            num_classes,
        }
    }
}

impl Formatter for ClassificationFormatter {
    fn format(&self, table: &DataTable) -> Result<FormattedDataset> {
        if self.num_classes < 2 {
            return Err(CoreError::Validation(
                "classification needs at least two classes".into(),
            ));
        }
        let repr_column = table.resolve_column(self.representation.column_names())?;

        let mut usable: Vec<(String, f64)> = Vec::with_capacity(table.len());
        for row in table.rows() {
            let text = match cell_str(row.get(&repr_column)) {
                Some(t) if !t.trim().is_empty() => t,
                _ => continue,
            };
            let value = match cell_f64(row.get(&self.label_column)) {
                Some(v) if v.is_finite() => v,
                _ => continue,
            };
            usable.push((text, value));
        }
        if usable.is_empty() {
            return Err(CoreError::Data(format!(
                "no usable rows for representation {} and label {:?}",
                self.representation, self.label_column
            )));
        }

        let values: Vec<f64> = usable.iter().map(|(_, v)| *v).collect();
        let edges = quantile_edges(&values, self.num_classes);

        let samples = usable
            .into_iter()
            .map(|(text, value)| {
                let class = bucket(value, &edges);
                FormattedSample {
                    prompt: render_prompt(&self.property_name, &text),
                    completion: format!(" {}{}", class, COMPLETION_SUFFIX),
                    label: Label::Class(class),
                }
            })
            .collect();

        Ok(FormattedDataset::new(self.property_name.clone(), samples))
    }
}

/// Build the formatter a parameter combination calls for.
pub fn formatter_for(params: &ExperimentParams, spec: &DatasetSpec) -> Box<dyn Formatter> {
    match params.num_classes {
        Some(num_classes) => Box::new(ClassificationFormatter::new(
            params.representation,
            spec.property_name.clone(),
            spec.label_column.clone(),
            num_classes,
        )),
        None => Box::new(
            RegressionFormatter::new(
                params.representation,
                spec.property_name.clone(),
                spec.label_column.clone(),
            )
            .with_num_digits(spec.num_label_digits),
        ),
    }
}

/// Inner quantile cut points splitting `values` into `num_classes` buckets.
pub fn quantile_edges(values: &[f64], num_classes: usize) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    (1..num_classes)
        .map(|i| quantile(&sorted, i as f64 / num_classes as f64))
        .collect()
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Values equal to an edge fall into the lower bucket.
fn bucket(value: f64, edges: &[f64]) -> usize {
    edges.iter().filter(|edge| value > **edge).count()
}

fn round_to(value: f64, digits: usize) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}
