// Domain layer: 電力剖面的核心模型與對外介面 (ports)。

pub mod model;
pub mod ports;
