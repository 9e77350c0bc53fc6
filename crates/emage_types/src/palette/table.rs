//! The fixed 256-entry map colour table.

use super::Color;

/// Global palette. Groups of four are the same base colour at four shade levels;
/// indices 0..4 are transparent and the trailing group is unused.
#[rustfmt::skip]
pub(super) const PALETTE: [Color; 256] = [
	Color::rgb(0, 0, 0), Color::rgb(0, 0, 0), Color::rgb(0, 0, 0), Color::rgb(0, 0, 0),
	Color::rgb(89, 125, 39), Color::rgb(109, 153, 48), Color::rgb(127, 178, 56), Color::rgb(67, 94, 29),
	Color::rgb(174, 164, 115), Color::rgb(213, 201, 140), Color::rgb(247, 233, 163), Color::rgb(130, 123, 86),
	Color::rgb(140, 140, 140), Color::rgb(171, 171, 171), Color::rgb(199, 199, 199), Color::rgb(105, 105, 105),
	Color::rgb(180, 0, 0), Color::rgb(220, 0, 0), Color::rgb(255, 0, 0), Color::rgb(135, 0, 0),
	Color::rgb(112, 112, 180), Color::rgb(138, 138, 220), Color::rgb(160, 160, 255), Color::rgb(84, 84, 135),
	Color::rgb(117, 117, 117), Color::rgb(144, 144, 144), Color::rgb(167, 167, 167), Color::rgb(88, 88, 88),
	Color::rgb(0, 87, 0), Color::rgb(0, 106, 0), Color::rgb(0, 124, 0), Color::rgb(0, 65, 0),
	Color::rgb(180, 180, 180), Color::rgb(220, 220, 220), Color::rgb(255, 255, 255), Color::rgb(135, 135, 135),
	Color::rgb(115, 118, 129), Color::rgb(141, 144, 158), Color::rgb(164, 168, 184), Color::rgb(86, 88, 97),
	Color::rgb(106, 76, 54), Color::rgb(130, 94, 66), Color::rgb(151, 109, 77), Color::rgb(79, 57, 40),
	Color::rgb(79, 79, 79), Color::rgb(96, 96, 96), Color::rgb(112, 112, 112), Color::rgb(59, 59, 59),
	Color::rgb(45, 45, 180), Color::rgb(55, 55, 220), Color::rgb(64, 64, 255), Color::rgb(33, 33, 135),
	Color::rgb(100, 84, 50), Color::rgb(123, 102, 62), Color::rgb(143, 119, 72), Color::rgb(75, 63, 38),
	Color::rgb(180, 177, 172), Color::rgb(220, 217, 211), Color::rgb(255, 252, 245), Color::rgb(135, 133, 129),
	Color::rgb(152, 89, 36), Color::rgb(186, 109, 44), Color::rgb(216, 127, 51), Color::rgb(114, 67, 27),
	Color::rgb(125, 53, 152), Color::rgb(153, 65, 186), Color::rgb(178, 76, 216), Color::rgb(94, 40, 114),
	Color::rgb(72, 108, 152), Color::rgb(88, 132, 186), Color::rgb(102, 153, 216), Color::rgb(54, 81, 114),
	Color::rgb(161, 161, 36), Color::rgb(197, 197, 44), Color::rgb(229, 229, 51), Color::rgb(121, 121, 27),
	Color::rgb(89, 144, 17), Color::rgb(109, 176, 21), Color::rgb(127, 204, 25), Color::rgb(67, 108, 13),
	Color::rgb(170, 89, 116), Color::rgb(208, 109, 142), Color::rgb(242, 127, 165), Color::rgb(127, 67, 87),
	Color::rgb(53, 53, 53), Color::rgb(65, 65, 65), Color::rgb(76, 76, 76), Color::rgb(40, 40, 40),
	Color::rgb(108, 108, 108), Color::rgb(132, 132, 132), Color::rgb(153, 153, 153), Color::rgb(81, 81, 81),
	Color::rgb(53, 89, 108), Color::rgb(65, 109, 132), Color::rgb(76, 127, 153), Color::rgb(40, 67, 81),
	Color::rgb(89, 44, 125), Color::rgb(109, 54, 153), Color::rgb(127, 63, 178), Color::rgb(67, 33, 94),
	Color::rgb(36, 53, 125), Color::rgb(44, 65, 153), Color::rgb(51, 76, 178), Color::rgb(27, 40, 94),
	Color::rgb(72, 53, 36), Color::rgb(88, 65, 44), Color::rgb(102, 76, 51), Color::rgb(54, 40, 27),
	Color::rgb(72, 89, 36), Color::rgb(88, 109, 44), Color::rgb(102, 127, 51), Color::rgb(54, 67, 27),
	Color::rgb(108, 36, 36), Color::rgb(132, 44, 44), Color::rgb(153, 51, 51), Color::rgb(81, 27, 27),
	Color::rgb(17, 17, 17), Color::rgb(21, 21, 21), Color::rgb(25, 25, 25), Color::rgb(13, 13, 13),
	Color::rgb(176, 168, 54), Color::rgb(215, 205, 66), Color::rgb(250, 238, 77), Color::rgb(132, 126, 40),
	Color::rgb(64, 154, 150), Color::rgb(79, 188, 183), Color::rgb(92, 219, 213), Color::rgb(48, 115, 112),
	Color::rgb(52, 90, 180), Color::rgb(63, 110, 220), Color::rgb(74, 128, 255), Color::rgb(39, 67, 135),
	Color::rgb(0, 153, 40), Color::rgb(0, 187, 50), Color::rgb(0, 217, 58), Color::rgb(0, 114, 30),
	Color::rgb(91, 60, 34), Color::rgb(111, 74, 42), Color::rgb(129, 86, 49), Color::rgb(68, 45, 25),
	Color::rgb(79, 1, 0), Color::rgb(96, 1, 0), Color::rgb(112, 2, 0), Color::rgb(59, 1, 0),
	Color::rgb(147, 124, 113), Color::rgb(180, 152, 138), Color::rgb(209, 177, 161), Color::rgb(110, 93, 85),
	Color::rgb(112, 57, 25), Color::rgb(137, 70, 31), Color::rgb(159, 82, 36), Color::rgb(84, 43, 19),
	Color::rgb(105, 61, 76), Color::rgb(128, 75, 93), Color::rgb(149, 87, 108), Color::rgb(78, 46, 57),
	Color::rgb(79, 76, 97), Color::rgb(96, 93, 119), Color::rgb(112, 108, 138), Color::rgb(59, 57, 73),
	Color::rgb(131, 93, 25), Color::rgb(160, 114, 31), Color::rgb(186, 133, 36), Color::rgb(98, 70, 19),
	Color::rgb(72, 82, 37), Color::rgb(88, 100, 45), Color::rgb(103, 117, 53), Color::rgb(54, 61, 28),
	Color::rgb(112, 54, 55), Color::rgb(138, 66, 67), Color::rgb(160, 77, 78), Color::rgb(84, 40, 41),
	Color::rgb(40, 28, 24), Color::rgb(49, 35, 30), Color::rgb(57, 41, 35), Color::rgb(30, 21, 18),
	Color::rgb(95, 75, 69), Color::rgb(116, 92, 84), Color::rgb(135, 107, 98), Color::rgb(71, 56, 51),
	Color::rgb(61, 64, 64), Color::rgb(75, 79, 79), Color::rgb(87, 92, 92), Color::rgb(46, 48, 48),
	Color::rgb(86, 51, 62), Color::rgb(105, 62, 75), Color::rgb(122, 73, 88), Color::rgb(64, 38, 46),
	Color::rgb(53, 43, 64), Color::rgb(65, 53, 79), Color::rgb(76, 62, 92), Color::rgb(40, 32, 48),
	Color::rgb(53, 35, 24), Color::rgb(65, 43, 30), Color::rgb(76, 50, 35), Color::rgb(40, 26, 18),
	Color::rgb(53, 57, 29), Color::rgb(65, 70, 36), Color::rgb(76, 82, 42), Color::rgb(40, 43, 22),
	Color::rgb(100, 42, 32), Color::rgb(122, 51, 39), Color::rgb(142, 60, 46), Color::rgb(75, 31, 24),
	Color::rgb(26, 15, 11), Color::rgb(31, 18, 13), Color::rgb(37, 22, 16), Color::rgb(19, 11, 8),
	Color::rgb(133, 33, 34), Color::rgb(163, 41, 42), Color::rgb(189, 48, 49), Color::rgb(100, 25, 25),
	Color::rgb(104, 44, 68), Color::rgb(127, 54, 83), Color::rgb(148, 63, 97), Color::rgb(78, 33, 51),
	Color::rgb(64, 17, 20), Color::rgb(79, 21, 25), Color::rgb(92, 25, 29), Color::rgb(48, 13, 15),
	Color::rgb(15, 88, 94), Color::rgb(18, 108, 115), Color::rgb(22, 126, 134), Color::rgb(11, 66, 70),
	Color::rgb(40, 100, 98), Color::rgb(50, 122, 120), Color::rgb(58, 142, 140), Color::rgb(30, 75, 74),
	Color::rgb(60, 31, 43), Color::rgb(74, 37, 53), Color::rgb(86, 44, 62), Color::rgb(45, 23, 32),
	Color::rgb(14, 127, 93), Color::rgb(17, 155, 114), Color::rgb(20, 180, 133), Color::rgb(10, 95, 70),
	Color::rgb(70, 70, 70), Color::rgb(86, 86, 86), Color::rgb(100, 100, 100), Color::rgb(52, 52, 52),
	Color::rgb(152, 123, 103), Color::rgb(186, 150, 126), Color::rgb(216, 175, 147), Color::rgb(114, 92, 77),
	Color::rgb(89, 117, 105), Color::rgb(109, 144, 129), Color::rgb(127, 167, 150), Color::rgb(67, 88, 79),
	Color::rgb(105, 85, 98), Color::rgb(128, 103, 120), Color::rgb(148, 120, 138), Color::rgb(78, 63, 73),
	Color::rgb(0, 0, 0), Color::rgb(0, 0, 0), Color::rgb(0, 0, 0), Color::rgb(0, 0, 0),
];
