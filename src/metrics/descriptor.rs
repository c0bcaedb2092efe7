//! Metric descriptor tables shared by the describe and collect paths.

use std::collections::HashMap;

use prometheus::core::Desc;
use prometheus::proto::{Counter, Gauge, Metric, MetricFamily, MetricType};

/// Prefix used for every exported series unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "go_mongo";

/// How a series is exposed to the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl From<MetricKind> for MetricType {
    fn from(kind: MetricKind) -> Self {
        match kind {
            MetricKind::Counter => MetricType::COUNTER,
            MetricKind::Gauge => MetricType::GAUGE,
        }
    }
}

/// Static description of one exported series.
#[derive(Clone, Copy, Debug)]
pub struct MetricSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
}

/// Joins a namespace and a metric name the way Prometheus expects.
pub fn fq_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}_{}", namespace, name)
    }
}

/// Descriptors built once from a `MetricSpec` table.
///
/// `descs` and `families` walk the same entries in the same order, so a
/// collector built on a `DescriptorSet` always emits exactly what it announces.
#[derive(Clone, Debug)]
pub struct DescriptorSet {
    entries: Vec<(Desc, MetricKind)>,
}

impl DescriptorSet {
    pub fn new(namespace: &str, specs: &[MetricSpec]) -> prometheus::Result<Self> {
        let entries = specs
            .iter()
            .map(|spec| {
                let desc = Desc::new(
                    fq_name(namespace, spec.name),
                    spec.help.to_string(),
                    Vec::new(),
                    HashMap::new(),
                )?;
                Ok((desc, spec.kind))
            })
            .collect::<prometheus::Result<Vec<_>>>()?;

        Ok(DescriptorSet { entries })
    }

    pub fn descs(&self) -> Vec<&Desc> {
        self.entries.iter().map(|(desc, _)| desc).collect()
    }

    /// Renders one single-sample family per descriptor.
    ///
    /// `values` is indexed like the table the set was built from.
    pub fn families(&self, values: &[u64]) -> Vec<MetricFamily> {
        debug_assert_eq!(values.len(), self.entries.len());

        self.entries
            .iter()
            .zip(values)
            .map(|((desc, kind), value)| family(desc, *kind, *value as f64))
            .collect()
    }
}

fn family(desc: &Desc, kind: MetricKind, value: f64) -> MetricFamily {
    let mut metric = Metric::default();
    match kind {
        MetricKind::Counter => {
            let mut counter = Counter::default();
            counter.set_value(value);
            metric.set_counter(counter);
        }
        MetricKind::Gauge => {
            let mut gauge = Gauge::default();
            gauge.set_value(value);
            metric.set_gauge(gauge);
        }
    }

    let mut family = MetricFamily::default();
    family.set_name(desc.fq_name.clone());
    family.set_help(desc.help.clone());
    family.set_field_type(kind.into());
    family.mut_metric().push(metric);
    family
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: [MetricSpec; 2] = [
        MetricSpec {
            name: "things_seen",
            help: "Things seen.",
            kind: MetricKind::Counter,
        },
        MetricSpec {
            name: "things_now",
            help: "Things right now.",
            kind: MetricKind::Gauge,
        },
    ];

    #[test]
    fn test_fq_name_joins_namespace() {
        assert_eq!(fq_name("go_mongo", "pool_created"), "go_mongo_pool_created");
        assert_eq!(fq_name("", "pool_created"), "pool_created");
    }

    #[test]
    fn test_families_follow_descriptor_order() {
        let set = DescriptorSet::new("test", &SPECS).unwrap();
        let names: Vec<_> = set.descs().iter().map(|d| d.fq_name.clone()).collect();
        assert_eq!(names, vec!["test_things_seen", "test_things_now"]);

        let families = set.families(&[3, 7]);
        assert_eq!(families.len(), 2);

        assert_eq!(families[0].get_name(), "test_things_seen");
        assert_eq!(families[0].get_help(), "Things seen.");
        assert_eq!(families[0].get_field_type(), MetricType::COUNTER);
        assert_eq!(families[0].get_metric()[0].get_counter().get_value(), 3.0);

        assert_eq!(families[1].get_name(), "test_things_now");
        assert_eq!(families[1].get_field_type(), MetricType::GAUGE);
        assert_eq!(families[1].get_metric()[0].get_gauge().get_value(), 7.0);
    }

    #[test]
    fn test_invalid_namespace_is_rejected() {
        assert!(DescriptorSet::new("not a namespace", &SPECS).is_err());
    }
}
