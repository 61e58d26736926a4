// ==========================================
// 矿山爆破预测系统 - 噪声源
// ==========================================
// 职责: 为估算引擎提供 [0,1) 均匀分布的扰动值
// 红线: 引擎不读取全局随机数,噪声源由调用方注入并持有
// ==========================================

/// 噪声源
///
/// 每次调用返回一个 [0,1) 内的值。引擎在单次估算内按固定顺序抽取 6 次,
/// 跨调用之间不做顺序约束;共享同一噪声源的并发调用方需自行加锁。
pub trait NoiseSource {
    fn next_unit(&mut self) -> f64;
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

// ==========================================
// ConstantNoise - 常量噪声
// ==========================================
/// 每次返回同一个值,用于测试与固定场景复现
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

// ==========================================
// SequenceNoise - 脚本化噪声
// ==========================================
/// 按给定序列依次返回,序列耗尽后从头循环
///
/// 空序列恒返回 0.0
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceNoise {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceNoise {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// 已抽取次数
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl NoiseSource for SequenceNoise {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

// ==========================================
// SeededNoise - xorshift64* 伪随机
// ==========================================
/// 生产环境默认噪声源
///
/// 非密码学强度,只用于模拟 ±波动。相同种子产生相同序列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededNoise {
    state: u64,
}

impl SeededNoise {
    const MULTIPLIER: u64 = 0x2545_F491_4F6C_DD1D;

    /// 固定种子（0 会被替换为非零常量,xorshift 状态不能为 0）
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    /// 以随机 UUID 作为种子
    pub fn from_entropy() -> Self {
        let bits = uuid::Uuid::new_v4().as_u128();
        Self::with_seed((bits as u64) ^ ((bits >> 64) as u64))
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(Self::MULTIPLIER)
    }
}

impl NoiseSource for SeededNoise {
    fn next_unit(&mut self) -> f64 {
        // 取高 53 位映射到 [0, 1)
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_noise() {
        let mut noise = ConstantNoise(0.25);
        assert_eq!(noise.next_unit(), 0.25);
        assert_eq!(noise.next_unit(), 0.25);
    }

    #[test]
    fn test_sequence_noise_cycles() {
        let mut noise = SequenceNoise::new(vec![0.1, 0.2, 0.3]);
        let drawn: Vec<f64> = (0..5).map(|_| noise.next_unit()).collect();
        assert_eq!(drawn, vec![0.1, 0.2, 0.3, 0.1, 0.2]);
        assert_eq!(noise.draws(), 5);
    }

    #[test]
    fn test_sequence_noise_empty() {
        let mut noise = SequenceNoise::new(Vec::new());
        assert_eq!(noise.next_unit(), 0.0);
    }

    #[test]
    fn test_seeded_noise_reproducible_and_in_range() {
        let mut a = SeededNoise::with_seed(42);
        let mut b = SeededNoise::with_seed(42);

        for _ in 0..10_000 {
            let x = a.next_unit();
            assert_eq!(x, b.next_unit());
            assert!((0.0..1.0).contains(&x), "draw out of range: {}", x);
        }
    }

    #[test]
    fn test_seeded_noise_zero_seed_not_stuck() {
        let mut noise = SeededNoise::with_seed(0);
        let first = noise.next_unit();
        let second = noise.next_unit();
        assert_ne!(first, second);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn draw_once<N: NoiseSource>(mut noise: N) -> f64 {
            noise.next_unit()
        }

        let mut inner = SequenceNoise::new(vec![0.7]);
        assert_eq!(draw_once(&mut inner), 0.7);
        assert_eq!(inner.draws(), 1);

        let boxed: Box<dyn NoiseSource> = Box::new(ConstantNoise(0.3));
        assert_eq!(draw_once(boxed), 0.3);
    }
}
