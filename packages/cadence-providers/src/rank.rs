/// Modifier bits that turn gold grades silver.
pub const MOD_HIDDEN: u32 = 1 << 3;
pub const MOD_FLASHLIGHT: u32 = 1 << 10;
pub const MOD_FADE_IN: u32 = 1 << 20;

/// Classifies one completed play into a letter grade from its mode,
/// modifier flags, accuracy ratio and hit counts.
pub trait RankClassifier
where
	Self: Send + Sync,
{
	#[allow(clippy::too_many_arguments)]
	fn classify(
		&self,
		mode: u8,
		mods: u32,
		accuracy: f64,
		count_300: i32,
		count_100: i32,
		count_50: i32,
		count_miss: i32,
	) -> String;
}

/// Stock grade thresholds. Standard and taiko grade on hit-count ratios;
/// catch and mania grade on the accuracy ratio. Hidden, flashlight or
/// fade-in turn SS/S into their silver variants XH/SH.
pub struct GradeClassifier;

impl RankClassifier for GradeClassifier {
	fn classify(
		&self,
		mode: u8,
		mods: u32,
		accuracy: f64,
		count_300: i32,
		count_100: i32,
		count_50: i32,
		count_miss: i32,
	) -> String {
		let grade = match mode {
			2 => catch_grade(accuracy),
			3 => mania_grade(accuracy),
			_ => standard_grade(count_300, count_100, count_50, count_miss),
		};
		let silver = mods & (MOD_HIDDEN | MOD_FLASHLIGHT | MOD_FADE_IN) != 0;

		match (grade, silver) {
			("SS", true) => "XH",
			("S", true) => "SH",
			_ => grade,
		}
		.to_string()
	}
}

fn standard_grade(count_300: i32, count_100: i32, count_50: i32, count_miss: i32) -> &'static str {
	if count_100 == 0 && count_50 == 0 && count_miss == 0 {
		return "SS";
	}

	let total = f64::from((count_300 + count_100 + count_50 + count_miss).max(1));
	let ratio_300 = f64::from(count_300) / total;
	let ratio_50 = f64::from(count_50) / total;

	if ratio_300 > 0.9 && ratio_50 <= 0.01 && count_miss == 0 {
		"S"
	} else if (ratio_300 > 0.8 && count_miss == 0) || ratio_300 > 0.9 {
		"A"
	} else if (ratio_300 > 0.7 && count_miss == 0) || ratio_300 > 0.8 {
		"B"
	} else if ratio_300 > 0.6 {
		"C"
	} else {
		"D"
	}
}

fn catch_grade(accuracy: f64) -> &'static str {
	if accuracy >= 1.0 {
		"SS"
	} else if accuracy > 0.98 {
		"S"
	} else if accuracy > 0.94 {
		"A"
	} else if accuracy > 0.90 {
		"B"
	} else if accuracy > 0.85 {
		"C"
	} else {
		"D"
	}
}

fn mania_grade(accuracy: f64) -> &'static str {
	if accuracy >= 1.0 {
		"SS"
	} else if accuracy > 0.95 {
		"S"
	} else if accuracy > 0.90 {
		"A"
	} else if accuracy > 0.80 {
		"B"
	} else if accuracy > 0.70 {
		"C"
	} else {
		"D"
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn classify(mode: u8, mods: u32, acc: f64, c300: i32, c100: i32, c50: i32, miss: i32) -> String {
		GradeClassifier.classify(mode, mods, acc, c300, c100, c50, miss)
	}

	#[test]
	fn perfect_standard_play_is_ss() {
		assert_eq!(classify(0, 0, 1.0, 500, 0, 0, 0), "SS");
	}

	#[test]
	fn hidden_turns_gold_grades_silver() {
		assert_eq!(classify(0, MOD_HIDDEN, 1.0, 500, 0, 0, 0), "XH");
		assert_eq!(classify(0, MOD_FLASHLIGHT, 0.97, 480, 20, 0, 0), "SH");
		assert_eq!(classify(0, MOD_HIDDEN, 0.8, 400, 50, 30, 20), classify(0, 0, 0.8, 400, 50, 30, 20));
	}

	#[test]
	fn misses_cap_standard_grades() {
		assert_eq!(classify(0, 0, 0.97, 480, 19, 0, 1), "A");
		assert_eq!(classify(0, 0, 0.85, 420, 50, 20, 10), "B");
	}

	#[test]
	fn low_ratio_standard_play_is_d() {
		assert_eq!(classify(0, 0, 0.5, 100, 200, 100, 100), "D");
	}

	#[test]
	fn catch_grades_on_accuracy() {
		assert_eq!(classify(2, 0, 1.0, 0, 0, 0, 0), "SS");
		assert_eq!(classify(2, 0, 0.985, 0, 0, 0, 0), "S");
		assert_eq!(classify(2, 0, 0.95, 0, 0, 0, 0), "A");
		assert_eq!(classify(2, 0, 0.80, 0, 0, 0, 0), "D");
	}

	#[test]
	fn mania_grades_on_accuracy() {
		assert_eq!(classify(3, 0, 1.0, 0, 0, 0, 0), "SS");
		assert_eq!(classify(3, 0, 0.96, 0, 0, 0, 0), "S");
		assert_eq!(classify(3, 0, 0.85, 0, 0, 0, 0), "B");
		assert_eq!(classify(3, 0, 0.60, 0, 0, 0, 0), "D");
	}
}
