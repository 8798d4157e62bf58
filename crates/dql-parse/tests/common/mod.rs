/// Queries that parse without diagnostics.
pub(crate) const VALID: &[&str] = &[
    "SELECT u FROM User u WHERE u.age > 18",
    "SELECT DISTINCT u.name AS n, COUNT(DISTINCT a.id) total FROM App\\Entity\\User u \
     LEFT JOIN u.articles a WITH a.published = TRUE GROUP BY u.name \
     HAVING COUNT(a.id) >= 2 ORDER BY total DESC, n",
    "UPDATE User u SET u.active = FALSE, u.score = u.score + 1 WHERE u.id IN (1, 2, 3)",
    "DELETE FROM User u WHERE u.email LIKE '%@example.com' ESCAPE '!' \
     AND u.createdAt BETWEEN :from AND :to",
    "SELECT NEW NAMED App\\Dto\\UserView(u.id, CONCAT(u.first, ' ', u.last) AS fullName) \
     FROM User u",
    "SELECT PARTIAL u.{id, name}, CASE WHEN u.age >= 18 THEN 'adult' ELSE 'minor' END AS grp\n\
     FROM User u INDEX BY u.id\n\
     WHERE EXISTS (SELECT a FROM Article a WHERE a.author = u) AND u NOT MEMBER OF :group",
    "SELECT u FROM User u WHERE u.deletedAt IS NULL AND u.roles IS NOT EMPTY \
     AND u INSTANCE OF (Admin, :type) AND TRIM(LEADING ' ' FROM u.name) <> '' \
     AND ABS(-u.balance) * 2 > ALL (SELECT MAX(b.amount) FROM Bill b) \
     ORDER BY CURRENT_DATE DESC",
    "SELECT u, SUM(p.total) FROM User u INNER JOIN Purchase p ON p.buyer = u \
     WHERE p.state IN (:states) OR p.total NOT BETWEEN 1 AND 10 GROUP BY u",
    "SELECT COALESCE(u.nick, u.name), NULLIF(u.age, 0), \
     CASE u.kind WHEN 1 THEN 'a' WHEN 2 THEN 'b' END FROM User u \
     WHERE u.name LIKE :pattern AND u.score / 2 <= SIZE(u.badges) AND u.id = ?1",
    "-- active users\nSELECT u /* everyone */ FROM User u\n\nDELETE FROM Session s\n\
     UPDATE Counter c SET c.value = c.value + 1\n",
];

/// Malformed queries exercising every recovery path.
pub(crate) const INVALID: &[&str] = &[
    "",
    "   \n\t",
    "SELECT u FROM User u WHERE u.age >",
    "SELECT FROM\nSELECT u FROM User u",
    "DELETE FROM User u WHERE ASC DESC ASC DESC",
    "UPDATE User u SET WHERE u.id = 1",
    "SELECT u FROM User u WHERE u.name = 'open",
    "SELECT u FROM User u WHERE (u.a = 1 OR (u.b = 2)",
    "SELECT a, FROM A a; DELETE FROM B b;",
    "-- comment\nSELECT /* c */ u FROM User u # @ ! WHERE",
    "SELECT u FROM User u JOIN u.x WITH",
    "SELECT CASE WHEN THEN END FROM",
    "SELECT TRIM(BOTH FROM u.name), COUNT(*) FROM User u WHERE u.x IS u.y",
    "SELECT u FROM User u WHERE u.id = 1 = 2 SELECT 1e FROM X x WHERE ?",
    "SELECT u FROM User u /* never closed",
    "FROM User u WHERE u.id = 1 SELECT u FROM User u",
];

pub(crate) fn corpus() -> impl Iterator<Item = &'static str> {
    VALID.iter().chain(INVALID).copied()
}
