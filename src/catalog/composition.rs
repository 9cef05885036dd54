// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline composition: splitting definitions, resolving segments, and
//! chaining wrappers with the `and_then` operator.

use std::sync::Arc;

use futures::FutureExt;

use crate::catalog::registration::RegistrationStore;
use crate::errors::CompositionError;
use crate::invocation::{ConversionServices, FunctionInvocationWrapper};
use crate::observability::messages::catalog::PipelineSegmentUnresolved;
use crate::traits::FunctionTarget;
use crate::types::{FunctionShape, TypeShape};

/// Resolve a pipeline definition into wrappers, folding segments
/// left-to-right. Returns every produced prefix (`a`, `a|b`, `a|b|c`),
/// last one being the requested pipeline, so the caller can memoize all
/// of them. An unresolvable segment yields `Ok(None)`; an unsupported
/// composition is an error.
pub(crate) fn compose(
    store: &RegistrationStore,
    services: &Arc<ConversionServices>,
    definition: &str,
) -> Result<Option<Vec<(String, FunctionInvocationWrapper)>>, CompositionError> {
    let segments: Vec<&str> = definition
        .split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        return Ok(None);
    }

    let mut produced = Vec::with_capacity(segments.len());
    let mut composed: Option<FunctionInvocationWrapper> = None;
    for segment in segments {
        let Some(registration) = store.find(segment) else {
            tracing::debug!(
                "{}",
                PipelineSegmentUnresolved {
                    definition,
                    segment,
                }
            );
            return Ok(None);
        };
        let wrapper = FunctionInvocationWrapper::new(
            segment,
            registration.target().clone(),
            registration.shape().clone(),
            services.clone(),
        );
        let current = match composed.take() {
            None => wrapper,
            Some(first) => first.and_then(&wrapper)?,
        };
        produced.push((current.definition().to_string(), current.clone()));
        composed = Some(current);
    }
    Ok(Some(produced))
}

impl FunctionInvocationWrapper {
    /// Chain `self` with `after` into one composed wrapper.
    ///
    /// The composite shape is derived from the chain's ends and never
    /// re-derived from the composed closure: a consuming `after` makes
    /// the composite a consumer of `self`'s input; a producing `self`
    /// makes it a producer whose output keeps `self`'s stream
    /// cardinality; otherwise the composite transforms `self`'s input
    /// into `after`'s output. Multi-argument tuple types on any side do
    /// not compose, and nothing composes after a consumer.
    pub fn and_then(
        &self,
        after: &FunctionInvocationWrapper,
    ) -> Result<FunctionInvocationWrapper, CompositionError> {
        let tuple_sided = [
            self.input_type(),
            self.output_type(),
            after.input_type(),
            after.output_type(),
        ]
        .iter()
        .any(|shape| shape.map(TypeShape::is_tuple).unwrap_or(false));
        if tuple_sided {
            return Err(CompositionError::TupleFunction {
                first: self.definition().to_string(),
                second: after.definition().to_string(),
            });
        }

        let shape = if after.output_type().is_none() {
            FunctionShape {
                input: self.input_type().cloned(),
                output: None,
            }
        } else if self.input_type().is_none() {
            let output = match self.output_type() {
                Some(TypeShape::Stream(cardinality, _)) => after
                    .output_type()
                    .cloned()
                    .map(|inner| TypeShape::Stream(*cardinality, Box::new(inner))),
                _ => after.output_type().cloned(),
            };
            FunctionShape {
                input: None,
                output,
            }
        } else if self.output_type().is_none() {
            return Err(CompositionError::AfterConsumer {
                definition: self.definition().to_string(),
            });
        } else {
            FunctionShape {
                input: self.input_type().cloned(),
                output: after.output_type().cloned(),
            }
        };

        let definition = format!("{}|{}", self.definition(), after.definition());
        let first = self.clone_base();
        let second = after.clone_base();
        let target = FunctionTarget::Composed(Arc::new(move |input| {
            let first = first.clone();
            let second = second.clone();
            async move { second.dispatch(first.dispatch(input).await?).await }.boxed()
        }));

        Ok(FunctionInvocationWrapper::composed_instance(
            definition,
            target,
            shape,
            self.services().clone(),
        ))
    }
}
