use crate::domain::model::ElectricalProfilesList;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub begin: f64,
    pub end: f64,
    pub value: String,
}

/// 半開區間 `[begin, end)` 到值的對應；後寫入的區間覆蓋重疊部分。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeMap {
    segments: Vec<Segment>,
}

impl RangeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, begin: f64, end: f64, value: impl Into<String>) {
        if begin >= end {
            return;
        }

        let mut next = Vec::with_capacity(self.segments.len() + 2);
        for segment in self.segments.drain(..) {
            if segment.end <= begin || segment.begin >= end {
                next.push(segment);
                continue;
            }
            if segment.begin < begin {
                next.push(Segment {
                    begin: segment.begin,
                    end: begin,
                    value: segment.value.clone(),
                });
            }
            if segment.end > end {
                next.push(Segment {
                    begin: end,
                    end: segment.end,
                    value: segment.value,
                });
            }
        }

        next.push(Segment {
            begin,
            end,
            value: value.into(),
        });
        next.sort_by(|a, b| a.begin.total_cmp(&b.begin));
        self.segments = next;
    }

    pub fn get(&self, position: f64) -> Option<&str> {
        let index = self.segments.partition_point(|s| s.begin <= position);
        let segment = self.segments.get(index.checked_sub(1)?)?;
        (position < segment.end).then_some(segment.value.as_str())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// power class -> track -> 區間值
#[derive(Debug, Clone, Default)]
pub struct ProfileMapping {
    mapping: HashMap<String, HashMap<String, RangeMap>>,
}

impl ProfileMapping {
    pub fn from_profiles(profiles: &ElectricalProfilesList) -> Self {
        let mut mapping: HashMap<String, HashMap<String, RangeMap>> = HashMap::new();

        for profile in profiles.profiles() {
            let by_track = mapping.entry(profile.power_class.clone()).or_default();
            for range in &profile.track_ranges {
                by_track
                    .entry(range.track.clone())
                    .or_default()
                    .put(range.begin, range.end, profile.value.as_str());
            }
        }

        Self { mapping }
    }

    pub fn track(&self, power_class: &str, track: &str) -> Option<&RangeMap> {
        self.mapping.get(power_class)?.get(track)
    }

    /// 依軌道 id 排序
    pub fn tracks(&self, power_class: &str) -> Vec<(&str, &RangeMap)> {
        let mut tracks: Vec<(&str, &RangeMap)> = self
            .mapping
            .get(power_class)
            .map(|by_track| by_track.iter().map(|(t, r)| (t.as_str(), r)).collect())
            .unwrap_or_default();
        tracks.sort_unstable_by(|a, b| a.0.cmp(b.0));
        tracks
    }

    pub fn value_at(&self, power_class: &str, track: &str, position: f64) -> Option<&str> {
        self.track(power_class, track)?.get(position)
    }

    pub fn power_classes(&self) -> impl Iterator<Item = &str> {
        self.mapping.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
