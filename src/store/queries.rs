/// 출품 삽입
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (title, description, category, grade, certification, weight, diameter,
                          composition, mint, year, starting_bid, current_bid, buy_now_price,
                          bid_count, status, version, created_at, end_time)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11, $12, 0, 'OPEN', 0, $13, $14)
    RETURNING *
"#;

/// 출품 조회
pub const GET_LISTING: &str = "SELECT * FROM listings WHERE id = $1";

/// 출품 목록 조회 (상태/카테고리 필터는 NULL이면 통과)
pub const LIST_LISTINGS: &str = r#"
    SELECT * FROM listings
    WHERE ($1::TEXT IS NULL OR status = $1)
      AND ($2::TEXT IS NULL OR category = $2)
    ORDER BY created_at DESC, id DESC
"#;

/// 입찰 이력 조회 (시간순)
pub const GET_BIDS: &str = r#"
    SELECT id, listing_id, amount, bidder, placed_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY id
"#;

/// 최고 입찰가 조회
pub const GET_HIGHEST_BID: &str =
    "SELECT MAX(amount) AS highest_bid FROM bids WHERE listing_id = $1";

/// 버전 조건부 입찰 반영 (버전이 일치할 때만 갱신)
pub const APPLY_BID: &str = r#"
    UPDATE listings
    SET current_bid = $2, bid_count = bid_count + 1, version = version + 1
    WHERE id = $1 AND version = $3
    RETURNING *
"#;

/// 입찰 기록 삽입
pub const INSERT_BID: &str =
    "INSERT INTO bids (listing_id, amount, bidder, placed_at) VALUES ($1, $2, $3, $4)";

/// 관리자 종료 (이미 CLOSED여도 그대로 성공)
pub const SET_CLOSED: &str = r#"
    UPDATE listings
    SET status = 'CLOSED', version = version + 1
    WHERE id = $1
    RETURNING *
"#;

/// 종료 시각이 지난 OPEN 출품 일괄 종료
pub const CLOSE_EXPIRED: &str = r#"
    UPDATE listings
    SET status = 'CLOSED', version = version + 1
    WHERE status = 'OPEN' AND end_time <= $1
"#;

/// 제출물 삽입
pub const INSERT_SUBMISSION: &str = r#"
    INSERT INTO submissions (kind, submitter_name, submitter_email, description, images,
                             submitted_at, status, reviewed_at)
    VALUES ($1, $2, $3, $4, $5, $6, 'PENDING', NULL)
    RETURNING *
"#;

/// 제출물 조회
pub const GET_SUBMISSION: &str = "SELECT * FROM submissions WHERE id = $1";

/// 제출물 목록 조회 (상태 필터는 NULL이면 통과)
pub const LIST_SUBMISSIONS: &str = r#"
    SELECT * FROM submissions
    WHERE ($1::TEXT IS NULL OR status = $1)
    ORDER BY submitted_at DESC, id DESC
"#;

/// PENDING 상태 조건부 판정 기록
pub const DECIDE_SUBMISSION: &str = r#"
    UPDATE submissions
    SET status = $2, reviewed_at = $3
    WHERE id = $1 AND status = 'PENDING'
    RETURNING *
"#;
