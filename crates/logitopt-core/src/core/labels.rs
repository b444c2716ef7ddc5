//! Label preprocessing for binary classification.
//!
//! Raw class labels of any ordered type are mapped onto `{-1, +1}`: the
//! smallest class becomes `-1` and every other value becomes `+1`. The
//! discovered classes are kept in a [`LabelInfo`] record so that later
//! calls (validation folds, test data) reuse exactly the same mapping.

use crate::core::{
    error::{ModelError, Result},
    types::{DVector, Scalar},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Debug;

/// Classes discovered while preprocessing a label vector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelInfo<L> {
    /// Sorted distinct labels. `classes[0]` is mapped to `-1`.
    pub classes: Vec<L>,
}

impl<L> LabelInfo<L>
where
    L: PartialOrd + Clone + Debug,
{
    /// Builds the record from a label vector, requiring exactly two classes.
    pub fn from_labels(y: &[L]) -> Result<Self> {
        let classes = unique_sorted(y);
        match classes.len() {
            0 => Err(ModelError::insufficient_classes(
                "this solver needs samples of 2 classes in the data, but the data is empty",
            )),
            1 => Err(ModelError::insufficient_classes(format!(
                "this solver needs samples of 2 classes in the data, but the data \
                 contains only one class: {:?}",
                classes[0]
            ))),
            2 => Ok(Self { classes }),
            n => Err(ModelError::unsupported_multiclass(format!(
                "found {n} classes ({classes:?}); multiclass is not implemented yet"
            ))),
        }
    }

    /// Returns the label mapped to `-1`.
    pub fn negative_class(&self) -> Result<&L> {
        self.classes.first().ok_or_else(|| {
            ModelError::insufficient_classes("label info does not contain any class")
        })
    }

    /// Maps `y` onto `{-1, +1}` using this record.
    ///
    /// Labels equal to the negative class become `-1`; all other values,
    /// including labels never seen when the record was built, become `+1`.
    pub fn binarize<T: Scalar>(&self, y: &[L]) -> Result<DVector<T>> {
        let negative = self.negative_class()?;
        Ok(DVector::from_iterator(
            y.len(),
            y.iter().map(|label| {
                if label == negative {
                    -T::one()
                } else {
                    T::one()
                }
            }),
        ))
    }
}

/// Sorted distinct values of `y`.
///
/// Incomparable values (NaN) sort after every comparable value and are
/// collapsed into a single class, represented by the first one seen.
pub fn unique_sorted<L: PartialOrd + Clone>(y: &[L]) -> Vec<L> {
    let (mut classes, incomparable): (Vec<L>, Vec<L>) = y
        .iter()
        .cloned()
        .partition(|label| label.partial_cmp(label).is_some());
    classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    classes.dedup_by(|a, b| a == b);
    classes.extend(incomparable.into_iter().next());
    classes
}

/// Prepares a dataset for binary logistic regression.
///
/// `x` is passed through untouched. When `info` is `None` the classes are
/// discovered from `y` (exactly two are required); otherwise the supplied
/// record is reused.
///
/// # Errors
///
/// - [`ModelError::InsufficientClasses`] when fewer than two classes exist
/// - [`ModelError::UnsupportedMulticlass`] when more than two classes exist
pub fn preprocess<X, L, T>(
    x: X,
    y: &[L],
    info: Option<&LabelInfo<L>>,
) -> Result<(X, DVector<T>, LabelInfo<L>)>
where
    L: PartialOrd + Clone + Debug,
    T: Scalar,
{
    let info = match info {
        Some(info) => info.clone(),
        None => LabelInfo::from_labels(y)?,
    };
    let y = info.binarize(y)?;
    Ok((x, y, info))
}
