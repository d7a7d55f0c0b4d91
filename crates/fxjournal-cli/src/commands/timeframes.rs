//! 타임프레임 목록 명령어.

use std::io::Write;

use fxjournal_core::{DataConfig, Timeframe};

/// 지원하는 타임프레임과 가격 파일 경로를 출력합니다.
pub fn print_timeframes<W: Write>(data: &DataConfig, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "\n📋 지원 타임프레임")?;
    writeln!(out, "  {:<5} | {:>6} | 가격 파일", "라벨", "분")?;
    for tf in Timeframe::ALL {
        let path = data.price_path(tf);
        let marker = if path.exists() { "" } else { "  (없음)" };
        writeln!(
            out,
            "  {:<5} | {:>6} | {}{}",
            tf.label(),
            tf.as_minutes(),
            path.display(),
            marker
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_timeframe() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("GUD1_OHLC_dropnaCSV.csv"), "DateTime,Open,High,Low,Close\n").unwrap();
        let data = DataConfig {
            prices_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let mut out = Vec::new();
        print_timeframes(&data, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("GUM1_OHLC_dropnaCSV.csv  (없음)"));
        assert!(text.contains("1440"));
        assert!(text.lines().any(|l| l.ends_with("GUD1_OHLC_dropnaCSV.csv")));
    }
}
