use std::collections::VecDeque;

use eframe::egui::{Color32, Pos2, Rect};

use crate::signal::SensorSignal;


pub const GRAPH_CAPACITY: usize = 400;
pub const OPTICAL_STROKE: Color32 = Color32::WHITE;
pub const ACCELERATION_STROKE: Color32 = Color32::from_rgb(0xf7, 0xa3, 0x00);


/// A scrolling window over the most recent samples of one waveform.
#[derive(Debug, Clone)]
pub struct Graph {
    samples: VecDeque<i32>,
    capacity: usize,
    pub color: Color32,
}

impl Graph {
    pub fn new(capacity: usize, color: Color32) -> Self {
        Graph {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            color,
        }
    }

    pub fn add_value(&mut self, value: i32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[cfg(test)]
    pub fn samples(&self) -> impl Iterator<Item = i32> + '_ {
        self.samples.iter().copied()
    }

    /// Maps the window onto `rect`: x spreads over the full capacity, y over min..max.
    pub fn points(&self, rect: Rect) -> Vec<Pos2> {
        let (Some(min), Some(max)) = (self.samples.iter().min(), self.samples.iter().max()) else {
            return vec![];
        };
        let span = (*max - *min) as f32;
        let step = if self.capacity > 1 {
            rect.width() / (self.capacity - 1) as f32
        } else {
            0.0
        };

        self.samples
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let norm = if span > 0.0 { (v - *min) as f32 / span } else { 0.5 };
                Pos2::new(rect.left() + i as f32 * step, rect.bottom() - norm * rect.height())
            })
            .collect()
    }
}


/// The three graphs of the waveform layout.
#[derive(Debug, Clone)]
pub struct Graphs {
    pub green: Graph,
    pub blue: Graph,
    pub acceleration: Graph,
}

impl Default for Graphs {
    fn default() -> Self {
        Graphs {
            green: Graph::new(GRAPH_CAPACITY, OPTICAL_STROKE),
            blue: Graph::new(GRAPH_CAPACITY, OPTICAL_STROKE),
            acceleration: Graph::new(GRAPH_CAPACITY, ACCELERATION_STROKE),
        }
    }
}

impl Graphs {
    pub fn apply(&mut self, signal: &SensorSignal) {
        match signal {
            SensorSignal::OpticalWaveform(wave) => {
                for sample in wave {
                    self.green.add_value(sample.green);
                    self.blue.add_value(sample.blue);
                }
            }
            SensorSignal::AccelerationWaveform(wave) => {
                for &value in wave {
                    self.acceleration.add_value(value);
                }
            }
            SensorSignal::Disconnected => {
                self.green.clear();
                self.blue.clear();
                self.acceleration.clear();
            }
            _ => {}
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::OpticalSample;

    #[test]
    fn drops_oldest_when_full() {
        let mut graph = Graph::new(3, OPTICAL_STROKE);
        for v in 1..=5 {
            graph.add_value(v);
        }
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.samples().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn points_scale_into_rect() {
        let mut graph = Graph::new(3, OPTICAL_STROKE);
        graph.add_value(0);
        graph.add_value(5);
        graph.add_value(10);

        let rect = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 50.0));
        let points = graph.points(rect);

        assert_eq!(points[0], Pos2::new(0.0, 50.0));
        assert_eq!(points[1], Pos2::new(50.0, 25.0));
        assert_eq!(points[2], Pos2::new(100.0, 0.0));
    }

    #[test]
    fn flat_signal_sits_in_the_middle() {
        let mut graph = Graph::new(4, ACCELERATION_STROKE);
        graph.add_value(7);
        graph.add_value(7);
        let rect = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(30.0, 20.0));
        assert!(graph.points(rect).iter().all(|p| p.y == 10.0));
        assert!(Graph::new(4, ACCELERATION_STROKE).points(rect).is_empty());
    }

    #[test]
    fn graphs_split_optical_channels_and_clear_on_disconnect() {
        let mut graphs = Graphs::default();
        graphs.apply(&SensorSignal::OpticalWaveform(vec![
            OpticalSample { green: 10, blue: 20 },
            OpticalSample { green: 11, blue: 21 },
        ]));
        graphs.apply(&SensorSignal::AccelerationWaveform(vec![1, 2, 3]));

        assert_eq!(graphs.green.samples().collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(graphs.blue.samples().collect::<Vec<_>>(), vec![20, 21]);
        assert_eq!(graphs.acceleration.len(), 3);

        graphs.apply(&SensorSignal::Disconnected);
        assert!(graphs.green.is_empty());
        assert!(graphs.acceleration.is_empty());
    }
}
