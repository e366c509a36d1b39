/// Single-page form: submit titles as a background job, poll, render, export.
pub(crate) const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8"/>
<title>BookVPro</title>
<style>
body{font-family:Arial;padding:40px;}
textarea{width:700px;height:250px;}
table{border-collapse:collapse;margin-top:20px;}
th,td{border:1px solid #ccc;padding:8px;text-align:center;}
th{background:#222;color:#fff;}
.A{color:green;font-weight:bold;}
.B{color:red;font-weight:bold;}
.C{color:orange;font-weight:bold;}
</style>
</head>
<body>

<h2>BookVPro 통합 검색 시스템</h2>

<form method="post" action="/analyze">
<textarea id="keywords" name="keywords" placeholder="책 제목 줄바꿈 입력"></textarea><br><br>

총 입력 권수: <b id="count">0</b><br><br>

<button type="button" onclick="start()">검색 시작</button>
<button type="button" onclick="download()">엑셀 다운로드</button>
<button type="submit">바로 분석</button>
</form>

<div id="progress"></div>

<table id="table"></table>

<script>
const HEADERS = ["책이름", "검색량", "판매처개수", "분류", "링크"];
let jobId = null;
let results = [];

function titles() {
  return document.getElementById("keywords").value
    .split("\n").map(x => x.trim()).filter(x => x !== "");
}

document.getElementById("keywords").addEventListener("input", function () {
  document.getElementById("count").innerText = titles().length;
});

function start() {
  fetch("/start", {
    method: "POST",
    headers: {"Content-Type": "application/json"},
    body: JSON.stringify({keywords: titles()})
  })
  .then(r => r.json())
  .then(d => {
    if (!d.job_id) {
      document.getElementById("progress").innerText = d.error || "요청 실패";
      return;
    }
    jobId = d.job_id;
    poll();
  });
}

function poll() {
  fetch("/status/" + jobId)
  .then(r => r.json())
  .then(d => {
    if (d.error) {
      document.getElementById("progress").innerText = d.error;
      return;
    }
    document.getElementById("progress").innerText = "진행률: " + d.progress + "%";
    results = d.results;
    render();
    if (d.status !== "completed") {
      setTimeout(poll, 2000);
    }
  });
}

function cell(row, text, className) {
  const td = document.createElement("td");
  td.textContent = text;
  if (className) td.className = className;
  row.appendChild(td);
  return td;
}

function render() {
  const table = document.getElementById("table");
  table.replaceChildren();
  const head = table.insertRow();
  HEADERS.forEach(h => {
    const th = document.createElement("th");
    th.textContent = h;
    head.appendChild(th);
  });

  results.forEach(r => {
    const row = table.insertRow();
    cell(row, r.title);
    cell(row, r.search_volume);
    cell(row, r.seller_count);
    cell(row, r.grade, r.grade);
    const link = document.createElement("a");
    link.href = r.link;
    link.target = "_blank";
    link.rel = "noopener";
    link.textContent = "열기";
    cell(row, "").appendChild(link);
  });
}

function download() {
  fetch("/download", {
    method: "POST",
    headers: {"Content-Type": "application/json"},
    body: JSON.stringify({results: results})
  })
  .then(r => r.blob())
  .then(blob => {
    const url = window.URL.createObjectURL(blob);
    const a = document.createElement("a");
    a.href = url;
    a.download = "result.xlsx";
    a.click();
    window.URL.revokeObjectURL(url);
  });
}
</script>

</body>
</html>
"#;
